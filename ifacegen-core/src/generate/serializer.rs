//! API model → declaration text.
//!
//! One unit renders as the sorted `using` list followed by a single
//! namespace block. The body is rendered first so the namespaces it
//! references are known before the imports are written.

use tracing::warn;

use super::literal::format_literal;
use super::writer::CodeWriter;
use crate::model::{
    Access, ApiAttribute, ApiMember, ApiParameter, ApiType, ApiTypeParameter, CompilationUnit,
    Constraint, MemberKind, MethodSig, Modifiers, PropertySig, RefKind, TypeRef,
};
use crate::resolve::{NameResolver, NamespaceSet};

/// Serialized output for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub key: String,
    pub text: String,
    /// Parameter defaults and attribute arguments left out because their
    /// kind has no literal form.
    pub dropped_constants: usize,
}

/// Stateless serializer; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    names: NameResolver,
}

impl Generator {
    pub fn new(simplify_namespaces: bool) -> Self {
        Self {
            names: NameResolver::new(simplify_namespaces),
        }
    }

    pub fn serialize(&self, unit: &CompilationUnit) -> GeneratedUnit {
        let mut emitter = Emitter {
            names: &self.names,
            namespaces: NamespaceSet::new(),
            out: CodeWriter::new(),
            dropped_constants: 0,
            key: &unit.key,
        };

        match &unit.namespace {
            Some(ns) => {
                emitter.out.line(&format!("namespace {}", ns));
                emitter.out.open();
                emitter.types(&unit.types);
                emitter.out.close();
            }
            None => emitter.types(&unit.types),
        }

        let body = emitter.out.finish();
        let mut text = String::new();
        let mut any_import = false;
        for ns in emitter.namespaces.imports_for(unit.namespace.as_deref()) {
            text.push_str("using ");
            text.push_str(ns);
            text.push_str(";\n");
            any_import = true;
        }
        if any_import {
            text.push('\n');
        }
        text.push_str(&body);

        GeneratedUnit {
            key: unit.key.clone(),
            text,
            dropped_constants: emitter.dropped_constants,
        }
    }
}

struct Emitter<'g> {
    names: &'g NameResolver,
    namespaces: NamespaceSet,
    out: CodeWriter,
    dropped_constants: usize,
    key: &'g str,
}

impl Emitter<'_> {
    fn resolve(&mut self, ty: &TypeRef) -> String {
        self.names.resolve(ty, &mut self.namespaces)
    }

    fn types(&mut self, types: &[ApiType]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.out.blank();
            }
            self.declaration(ty);
        }
    }

    fn declaration(&mut self, ty: &ApiType) {
        self.attributes(&ty.attributes);

        let mut header = String::from(ty.access.keyword());
        if !ty.is_interface() {
            if let Some(kw) = ty.modifiers.keyword() {
                header.push(' ');
                header.push_str(kw);
            }
        }
        header.push(' ');
        header.push_str(ty.kind.keyword());
        header.push(' ');
        header.push_str(&ty.name);
        header.push_str(&self.type_parameter_list(&ty.type_parameters, ty.is_interface()));

        let mut bases = Vec::new();
        if !ty.is_interface() {
            if let Some(base) = &ty.base {
                bases.push(self.resolve(base));
            }
        }
        for iface in ty.interfaces() {
            bases.push(self.resolve(iface));
        }
        if !bases.is_empty() {
            header.push_str(" : ");
            header.push_str(&bases.join(", "));
        }
        self.out.line(&header);

        let clauses = self.where_clauses(&ty.type_parameters);
        self.out.indented(|w| {
            for clause in &clauses {
                w.line(clause);
            }
        });

        self.out.open();
        for member in ty.members() {
            self.member(ty, member);
        }
        self.out.close();
    }

    fn attributes(&mut self, attributes: &[ApiAttribute]) {
        for attr in attributes {
            let name =
                self.names
                    .resolve_with(&attr.attribute_type, false, false, &mut self.namespaces);
            let name = name.strip_suffix("Attribute").unwrap_or(&name).to_string();
            let mut args = Vec::new();
            for value in &attr.arguments {
                match format_literal(value) {
                    Some(literal) => args.push(literal),
                    None => {
                        warn!(
                            type_name = %self.key,
                            attribute = %name,
                            kind = %value.kind_name(),
                            "attribute argument has no literal form; dropped"
                        );
                        self.dropped_constants += 1;
                    }
                }
            }
            if args.is_empty() {
                self.out.line(&format!("[{}]", name));
            } else {
                self.out.line(&format!("[{}({})]", name, args.join(", ")));
            }
        }
    }

    /// `<T, out U>`; variance only on interface declarations.
    fn type_parameter_list(&self, params: &[ApiTypeParameter], with_variance: bool) -> String {
        if params.is_empty() {
            return String::new();
        }
        let rendered: Vec<String> = params
            .iter()
            .map(|p| match p.variance.keyword() {
                Some(kw) if with_variance && p.is_type_level() => format!("{} {}", kw, p.name),
                _ => p.name.clone(),
            })
            .collect();
        format!("<{}>", rendered.join(", "))
    }

    fn where_clauses(&mut self, params: &[ApiTypeParameter]) -> Vec<String> {
        params
            .iter()
            .filter(|p| !p.constraints.is_empty())
            .map(|p| {
                let parts: Vec<String> = p
                    .constraints
                    .iter()
                    .map(|c| match c {
                        Constraint::ReferenceType => "class".to_string(),
                        Constraint::ValueType => "struct".to_string(),
                        Constraint::Constructible => "new()".to_string(),
                        Constraint::Type(t) => self.resolve(t),
                    })
                    .collect();
                format!("where {} : {}", p.name, parts.join(", "))
            })
            .collect()
    }

    /// Leading keywords: only `new` inside interfaces, otherwise access
    /// plus the highest-priority modifier.
    fn member_prefix(&self, owner: &ApiType, member: &ApiMember) -> String {
        if owner.is_interface() {
            return if member.hides_base() {
                "new ".to_string()
            } else {
                String::new()
            };
        }
        let mut prefix = format!("{} ", member.access.keyword());
        if let Some(kw) = member.modifiers.keyword() {
            prefix.push_str(kw);
            prefix.push(' ');
        }
        prefix
    }

    fn member(&mut self, owner: &ApiType, member: &ApiMember) {
        self.attributes(&member.attributes);
        let prefix = self.member_prefix(owner, member);
        let in_interface = owner.is_interface();
        let bodiless = in_interface || is_abstract(member.modifiers);

        let line = match &member.kind {
            MemberKind::Field { field_type } => {
                format!("{}{} {};", prefix, self.resolve(field_type), member.name)
            }
            MemberKind::Property(sig) => {
                let ty = self.resolve(&sig.property_type);
                let accessors = accessors(sig, member.access, bodiless);
                format!("{}{} {} {}", prefix, ty, member.name, accessors)
            }
            MemberKind::Indexer {
                property,
                parameters,
            } => {
                let ty = self.resolve(&property.property_type);
                let params = self.parameters(parameters, in_interface);
                let accessors = accessors(property, member.access, bodiless);
                format!("{}{} this[{}] {}", prefix, ty, params, accessors)
            }
            MemberKind::Event {
                handler_type,
                explicit_accessors,
            } => {
                let handler = self.resolve(handler_type);
                if *explicit_accessors && !bodiless {
                    format!(
                        "{}event {} {} {{ add {{ }} remove {{ }} }}",
                        prefix, handler, member.name
                    )
                } else {
                    format!("{}event {} {};", prefix, handler, member.name)
                }
            }
            MemberKind::Method(sig) => {
                self.method(&prefix, &member.name, sig, bodiless, in_interface)
            }
            MemberKind::Constructor { parameters } => {
                let params = self.parameters(parameters, in_interface);
                format!("{}{}({}) {{ }}", prefix, owner.name, params)
            }
        };
        self.out.line(&line);
    }

    fn method(
        &mut self,
        prefix: &str,
        name: &str,
        sig: &MethodSig,
        bodiless: bool,
        in_interface: bool,
    ) -> String {
        let ret = self.resolve(&sig.return_type);
        let generics = self.type_parameter_list(&sig.type_parameters, false);
        let params = self.parameters(&sig.parameters, in_interface);
        let mut line = format!("{}{} {}{}({})", prefix, ret, name, generics, params);
        for clause in self.where_clauses(&sig.type_parameters) {
            line.push(' ');
            line.push_str(&clause);
        }
        line.push_str(if bodiless { ";" } else { " { throw null; }" });
        line
    }

    fn parameters(&mut self, params: &[ApiParameter], in_interface: bool) -> String {
        let rendered: Vec<String> = params
            .iter()
            .map(|p| self.parameter(p, in_interface))
            .collect();
        rendered.join(", ")
    }

    /// Interface members cannot be extension methods, so a `this`
    /// receiver becomes a plain parameter there.
    fn parameter(&mut self, p: &ApiParameter, in_interface: bool) -> String {
        let mut text = String::new();
        let keyword = match p.ref_kind {
            RefKind::This if in_interface => None,
            kind => kind.keyword(),
        };
        if let Some(kw) = keyword {
            text.push_str(kw);
            text.push(' ');
        }
        text.push_str(&self.resolve(&p.param_type));
        text.push(' ');
        text.push_str(&escape_identifier(&p.name));

        if let Some(value) = &p.default {
            match format_literal(value) {
                Some(literal) => {
                    text.push_str(" = ");
                    text.push_str(&literal);
                }
                None => {
                    warn!(
                        type_name = %self.key,
                        parameter = %p.name,
                        kind = %value.kind_name(),
                        "default value has no literal form; dropped"
                    );
                    self.dropped_constants += 1;
                }
            }
        }
        text
    }
}

fn is_abstract(modifiers: Modifiers) -> bool {
    modifiers.contains(Modifiers::ABSTRACT) && !modifiers.is_static_like()
}

/// `{ get; set; }`, with an access keyword on an accessor only when it
/// differs from the member's own.
fn accessors(sig: &PropertySig, member_access: Access, bodiless: bool) -> String {
    let body = if bodiless { ";" } else { " { throw null; }" };
    let render = |keyword: &str, access: Access| {
        if access == member_access {
            format!("{}{}", keyword, body)
        } else {
            format!("{} {}{}", access.keyword(), keyword, body)
        }
    };
    let mut parts = Vec::new();
    if let Some(access) = sig.getter {
        parts.push(render("get", access));
    }
    if let Some(access) = sig.setter {
        parts.push(render("set", access));
    }
    format!("{{ {} }}", parts.join(" "))
}

const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

/// Prefixes reserved words with `@`.
fn escape_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}
