use std::borrow::Cow;

use minijinja::{Environment, UndefinedBehavior};

use crate::resolved::Resolved;
use crate::utils::Result;

/// Body of a file to materialize.
#[derive(Debug, Clone)]
pub enum Content {
    /// Written byte for byte.
    Static(&'static str),
    /// Rendered against the resolved configuration at write time.
    Template {
        name: &'static str,
        source: &'static str,
    },
    /// Text computed while planning.
    Text(String),
}

pub struct Renderer {
    environment: Environment<'static>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        let mut environment = Environment::new();
        environment.set_keep_trailing_newline(true);
        environment.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { environment }
    }

    pub fn render<'c>(&self, content: &'c Content, resolved: &Resolved) -> Result<Cow<'c, str>> {
        match content {
            Content::Static(text) => Ok(Cow::Borrowed(text)),
            Content::Text(text) => Ok(Cow::Borrowed(text.as_str())),
            Content::Template { name, source } => {
                let template = self.environment.template_from_named_str(*name, *source)?;
                Ok(Cow::Owned(template.render(resolved)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::choice::Choice;
    use crate::utils::Error;

    fn resolved() -> Resolved {
        let mut answers = IndexMap::new();
        answers.insert(
            "database".to_string(),
            Choice::new("PostgreSQL", "postgresql", "pg", None),
        );
        let mut derived = IndexMap::new();
        derived.insert("app_slug".to_string(), "my-app".to_string());
        Resolved::new(answers, derived)
    }

    #[test]
    fn template_sees_answers_and_derived_values() {
        let content = Content::Template {
            name: "probe",
            source: "{{ database.value }} for {{ app_slug }}\n",
        };
        let rendered = Renderer::new().render(&content, &resolved()).unwrap();
        assert_eq!(rendered, "postgresql for my-app\n");
    }

    #[test]
    fn static_content_is_not_rendered() {
        let content = Content::Static("echo ${HOME} {{ not_a_key }}");
        let rendered = Renderer::new().render(&content, &resolved()).unwrap();
        assert_eq!(rendered, "echo ${HOME} {{ not_a_key }}");
    }

    #[test]
    fn unknown_key_fails_rendering() {
        let content = Content::Template {
            name: "probe",
            source: "{{ ruby_version }}",
        };
        let err = Renderer::new().render(&content, &resolved()).unwrap_err();
        assert!(matches!(err, Error::Template(_)));
    }
}
