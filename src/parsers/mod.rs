pub mod html;


use std::fmt;

/// What to read from each element matched by a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// The `href` attribute resolved against the page URL
    Link,
    /// A `data-*` attribute, named without its prefix
    Data(String),
}

impl Projection {
    pub fn data(name: &str) -> Self {
        Projection::Data(name.to_string())
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Link => write!(f, "link"),
            Projection::Data(name) => write!(f, "attribute data-{name}"),
        }
    }
}
