//! Declarative schema descriptions.
//!
//! Schemas are `static` values built with `const fn` constructors, so the
//! annotation set of every field is fixed at definition time and shared by
//! all requests. Nested schemas are referenced by `&'static`, which also
//! allows recursive shapes.

/// Per-leaf transformation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotations {
    /// Binary data: `0x` hex on the client side, base64 on the backend side.
    pub hex: bool,
    /// Unix-epoch seconds carried as a decimal string.
    pub time: bool,
    /// Closed set of symbolic values (lower-case canonical form).
    pub variants: Option<&'static [&'static str]>,
}

impl Annotations {
    pub const NONE: Self = Self {
        hex: false,
        time: false,
        variants: None,
    };

    pub fn is_empty(&self) -> bool {
        !self.hex && !self.time && self.variants.is_none()
    }
}

/// What a field holds.
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    /// Scalar leaf with zero or more annotations.
    Leaf(Annotations),
    /// Nested object described by another schema.
    Object(&'static Schema),
    /// Arbitrary JSON, passed through untouched.
    Any,
}

/// One named field of an object schema.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// JSON key on both sides of the boundary.
    pub key: &'static str,
    pub kind: Kind,
    /// The field holds a list; the kind applies to every element.
    pub repeated: bool,
}

impl Field {
    /// Unannotated scalar.
    pub const fn plain(key: &'static str) -> Self {
        Self::leaf(key, Annotations::NONE)
    }

    /// Binary data re-encoded between hex and base64.
    pub const fn hex(key: &'static str) -> Self {
        Self::leaf(
            key,
            Annotations {
                hex: true,
                time: false,
                variants: None,
            },
        )
    }

    /// Symbolic value validated against `variants`.
    pub const fn enumerated(key: &'static str, variants: &'static [&'static str]) -> Self {
        Self::leaf(
            key,
            Annotations {
                hex: false,
                time: false,
                variants: Some(variants),
            },
        )
    }

    /// Unix-epoch seconds string.
    pub const fn time(key: &'static str) -> Self {
        Self::leaf(
            key,
            Annotations {
                hex: false,
                time: true,
                variants: None,
            },
        )
    }

    pub const fn leaf(key: &'static str, annotations: Annotations) -> Self {
        Self {
            key,
            kind: Kind::Leaf(annotations),
            repeated: false,
        }
    }

    pub const fn object(key: &'static str, schema: &'static Schema) -> Self {
        Self {
            key,
            kind: Kind::Object(schema),
            repeated: false,
        }
    }

    pub const fn any(key: &'static str) -> Self {
        Self {
            key,
            kind: Kind::Any,
            repeated: false,
        }
    }

    /// Turn the field into a list of its kind.
    pub const fn list(self) -> Self {
        Self {
            repeated: true,
            ..self
        }
    }
}

/// Structural description of a JSON object.
#[derive(Debug)]
pub struct Schema {
    /// Name used in logs and error messages.
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Look up a field by its JSON key.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Default error schema: `{code, message}`.
pub static DEFAULT_ERROR: Schema = Schema::new(
    "default_error",
    &[Field::plain("code"), Field::plain("message")],
);
