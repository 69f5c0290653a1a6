use crate::error::SelectorError;
use std::fmt;
use std::str::FromStr;

/// A comma-separated list of class selectors, e.g. `.projects-box, .view-project-btn`.
///
/// An element matches when it carries every class of at least one component
/// (`.btn.ghost` needs both `btn` and `ghost`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    components: Vec<Vec<String>>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.split(',').all(|c| c.trim().is_empty()) {
            return Err(SelectorError::Empty);
        }

        let mut components = Vec::new();
        for raw in input.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(SelectorError::EmptyComponent(input.to_string()));
            }
            components.push(parse_component(raw)?);
        }
        Ok(Selector { components })
    }

    pub fn matches<S: AsRef<str>>(&self, classes: &[S]) -> bool {
        self.components.iter().any(|required| {
            required
                .iter()
                .all(|class| classes.iter().any(|c| c.as_ref() == class))
        })
    }
}

fn parse_component(raw: &str) -> Result<Vec<String>, SelectorError> {
    let unsupported = || SelectorError::Unsupported(raw.to_string());

    let Some(rest) = raw.strip_prefix('.') else {
        return Err(unsupported());
    };
    let mut classes = Vec::new();
    for class in rest.split('.') {
        let valid = !class.is_empty()
            && class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(unsupported());
        }
        classes.push(class.to_string());
    }
    Ok(classes)
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            for class in component {
                write!(f, ".{class}")?;
            }
        }
        Ok(())
    }
}
