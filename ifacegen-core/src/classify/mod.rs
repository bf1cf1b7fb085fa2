//! Member role classification and hiding detection.

pub mod member_classifier;
pub mod signature;

pub use member_classifier::{ClassifiedMember, ClassifierOptions, HidingStatus, MemberClassifier};
pub use signature::{signature_in, signature_of, MemberSignature, SignatureKind};
