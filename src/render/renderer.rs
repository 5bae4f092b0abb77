use crate::{
    compile::{
        tree::{Node, Partial, Section, Variable},
        Scope, Template,
    },
    context::is_truthy,
    format::Formatter,
    helper::Rendered,
    log::{error_partial_depth, Error},
    Context, Engine,
};
use serde_json::Value;

/// Partial inclusions nested deeper than this abort the render.
///
/// Catches template cycles, which would otherwise recurse forever.
pub(crate) const MAX_PARTIAL_DEPTH: usize = 32;

/// Walks a [`Template`] and writes output.
///
/// A [`Renderer`] borrows the [`Engine`] for helpers, partials and settings,
/// so it is cheap to create one per render.
pub struct Renderer<'source> {
    /// The engine providing helpers, loaders and settings.
    engine: &'source Engine,
    /// The template being rendered.
    template: &'source Template,
    /// Number of partial inclusions above this renderer.
    depth: usize,
}

impl<'source> Renderer<'source> {
    /// Create a new [`Renderer`] for the given [`Engine`] and [`Template`].
    #[inline]
    pub fn new(engine: &'source Engine, template: &'source Template) -> Self {
        Self {
            engine,
            template,
            depth: 0,
        }
    }

    /// Create a new [`Renderer`] nested at the given partial depth.
    #[inline]
    pub(crate) fn with_depth(
        engine: &'source Engine,
        template: &'source Template,
        depth: usize,
    ) -> Self {
        Self {
            engine,
            template,
            depth,
        }
    }

    /// Render the [`Template`] against the given [`Context`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a variable is missing in strict mode, a
    /// helper fails, or a partial cannot be loaded or compiled.
    pub fn render(&self, context: &mut Context) -> Result<String, Error> {
        let mut buffer = String::with_capacity(self.template.source.len());
        let mut formatter = Formatter::new(&mut buffer);
        self.render_scope(&self.template.scope, context, &mut formatter)?;

        Ok(buffer)
    }

    /// Render every [`Node`] in the given [`Scope`].
    fn render_scope(
        &self,
        scope: &Scope,
        context: &mut Context,
        formatter: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        for node in &scope.nodes {
            match node {
                Node::Text(region) => {
                    formatter.write_str(region.literal(&self.template.source))?
                }
                Node::Comment(_) => {}
                Node::Variable(variable) => self.render_variable(variable, context, formatter)?,
                Node::Section(section) => self.render_section(section, context, formatter)?,
                Node::Partial(partial) => self.render_partial(partial, context, formatter)?,
            }
        }

        Ok(())
    }

    /// Render a `{{ }}` or `{{{ }}}` expression.
    ///
    /// The leading word is dispatched to a registered helper when one
    /// exists, and resolved as a path otherwise.
    fn render_variable(
        &self,
        variable: &Variable,
        context: &mut Context,
        formatter: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let content = variable.content.literal(&self.template.source);
        let (head, args) = match content.find(char::is_whitespace) {
            Some(i) => (&content[..i], content[i..].trim_start()),
            None => (content, ""),
        };

        if let Some(helper) = self.engine.get_helper(head) {
            let body = Body {
                renderer: self,
                scope: None,
            };
            return match helper.call(body, context, args)? {
                Rendered::Text(text) if variable.escape => formatter.write_escaped(&text),
                Rendered::Text(text) | Rendered::Safe(text) => formatter.write_str(&text),
            };
        }

        let value = context.get(content, self.engine.is_strict())?;
        if variable.escape {
            formatter.write_value_escaped(&value)
        } else {
            formatter.write_value(&value)
        }
    }

    /// Render a `{{#name}} ... {{/name}}` or `{{^name}} ... {{/name}}`
    /// block.
    ///
    /// A registered helper with the block's name takes the body over.
    /// Otherwise the name is resolved as a path and the body is rendered
    /// zero or more times based on the value.
    fn render_section(
        &self,
        section: &Section,
        context: &mut Context,
        formatter: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let source = &self.template.source;
        let name = section.name.literal(source);
        let args = section
            .args
            .map(|region| region.literal(source))
            .unwrap_or("");

        if let Some(helper) = self.engine.get_helper(name) {
            let body = Body {
                renderer: self,
                scope: Some(&section.body),
            };
            let (Rendered::Text(text) | Rendered::Safe(text)) =
                helper.call(body, context, args)?;

            return formatter.write_str(&text);
        }

        // Value-driven blocks ignore lookup failures, a missing name is an
        // empty (falsy) block even in strict mode.
        let value = context.get(name, false)?;
        if section.inverted {
            if !is_truthy(&value) {
                self.render_scope(&section.body, context, formatter)?;
            }
            return Ok(());
        }

        match value {
            Value::Array(items) => {
                for (index, item) in items.into_iter().enumerate() {
                    context.push(item);
                    context.push_index(index);
                    context.push_key(Value::from(index));
                    let result = self.render_scope(&section.body, context, formatter);
                    context.pop_key();
                    context.pop_index();
                    context.pop();
                    result?;
                }
            }
            other if is_truthy(&other) => {
                context.push(other);
                let result = self.render_scope(&section.body, context, formatter);
                context.pop();
                result?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Render a `{{>name}}` inclusion.
    ///
    /// The included template is compiled through the engine, so it hits the
    /// cache, and shares the current [`Context`].
    fn render_partial(
        &self,
        partial: &Partial,
        context: &mut Context,
        formatter: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let name = partial.name.literal(&self.template.source);
        if self.depth >= MAX_PARTIAL_DEPTH {
            return Err(error_partial_depth(name, MAX_PARTIAL_DEPTH));
        }

        let text = self.engine.load_partial(name)?;
        let template = self
            .engine
            .compile_named(&text, Some(name))
            .map_err(|error| error.with_name(name))?;
        let output = Renderer::with_depth(self.engine, &template, self.depth + 1)
            .render(context)?;

        formatter.write_str(&output)
    }
}

/// The body of the block a [`Helper`][`crate::Helper`] was invoked with.
///
/// Inline invocations have no body, so [`Body::render`] returns an empty
/// string for them.
pub struct Body<'render> {
    renderer: &'render Renderer<'render>,
    scope: Option<&'render Scope>,
}

impl Body<'_> {
    /// Render the body against the given [`Context`].
    ///
    /// May be called any number of times, with different frames pushed onto
    /// the [`Context`] between calls.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when rendering the body fails.
    pub fn render(&self, context: &mut Context) -> Result<String, Error> {
        let scope = match self.scope {
            Some(scope) => scope,
            None => return Ok(String::new()),
        };

        let mut buffer = String::new();
        let mut formatter = Formatter::new(&mut buffer);
        self.renderer.render_scope(scope, context, &mut formatter)?;

        Ok(buffer)
    }

    /// Return true when the invocation has no body.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scope.map_or(true, |scope| scope.nodes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::Body;
    use crate::{
        helper::Rendered,
        log::ErrorKind,
        Context, Engine, Store,
    };
    use serde_json::json;

    fn helper_render(text: &str, store: &Store) -> String {
        Engine::default().render(text, store).unwrap()
    }

    #[test]
    fn test_render_text_and_variables() {
        let store = Store::new()
            .with_must("data", "hello")
            .with_must("nested", json!({"key": "world"}));

        assert_eq!(helper_render("{{data}}", &store), "hello");
        assert_eq!(helper_render("{{ data }}!", &store), "hello!");
        assert_eq!(helper_render("{{nested.key}}", &store), "world");
        assert_eq!(helper_render("{{! ignored }}x", &store), "x");
        assert_eq!(helper_render("{{missing}}", &store), "");
    }

    #[test]
    fn test_render_escaping() {
        let store = Store::new().with_must("html", "<b>\"hi\" & 'bye'</b>");

        assert_eq!(
            helper_render("{{html}}", &store),
            "&lt;b&gt;&quot;hi&quot; &amp; 'bye'&lt;/b&gt;"
        );
        assert_eq!(helper_render("{{{html}}}", &store), "<b>\"hi\" & 'bye'</b>");
    }

    #[test]
    fn test_render_value_sections() {
        let store = Store::new()
            .with_must("yes", true)
            .with_must("no", false)
            .with_must("list", json!([1, 2, 3, 4]))
            .with_must("person", json!({"name": "taylor"}));

        assert_eq!(helper_render("{{#yes}}on{{/yes}}", &store), "on");
        assert_eq!(helper_render("{{#no}}on{{/no}}", &store), "");
        assert_eq!(helper_render("{{#list}}{{this}}{{/list}}", &store), "1234");
        assert_eq!(
            helper_render("{{#person}}{{name}}{{/person}}", &store),
            "taylor"
        );
        assert_eq!(helper_render("{{#missing}}on{{/missing}}", &store), "");
    }

    #[test]
    fn test_render_inverted_sections() {
        let store = Store::new()
            .with_must("empty", json!([]))
            .with_must("full", json!([1]));

        assert_eq!(helper_render("{{^empty}}none{{/empty}}", &store), "none");
        assert_eq!(helper_render("{{^full}}none{{/full}}", &store), "");
        assert_eq!(helper_render("{{^missing}}none{{/missing}}", &store), "none");
    }

    #[test]
    fn test_render_parent_lookup() {
        let store = Store::new()
            .with_must("title", "list")
            .with_must("items", json!(["a", "b"]));

        assert_eq!(
            helper_render("{{#items}}{{../title}}:{{this}} {{/items}}", &store),
            "list:a list:b "
        );
    }

    #[test]
    fn test_render_loop_index_and_key() {
        let store = Store::new().with_must("items", json!(["a", "b"]));

        assert_eq!(
            helper_render("{{#items}}{{@index}}={{this}} {{/items}}", &store),
            "0=a 1=b "
        );
        assert_eq!(
            helper_render("{{#items}}{{@key}} {{/items}}", &store),
            "0 1 "
        );
    }

    #[test]
    fn test_render_custom_inline_helper() {
        let engine = Engine::default().with_helper_must("upper", |_body: Body, context: &mut Context, args: &str| {
            let value = context.get(args, false)?;
            let text = value.as_str().unwrap_or_default().to_uppercase();
            Ok(Rendered::Text(text))
        });
        let store = Store::new().with_must("name", "taylor");

        assert_eq!(engine.render("{{upper name}}", &store).unwrap(), "TAYLOR");
    }

    #[test]
    fn test_render_custom_block_helper() {
        let engine = Engine::default().with_helper_must("wrap", |body: Body, context: &mut Context, _args: &str| {
            let inner = body.render(context)?;
            Ok(Rendered::Safe(format!("[{inner}]")))
        });
        let store = Store::new().with_must("name", "taylor");

        assert_eq!(
            engine.render("{{#wrap}}{{name}}{{/wrap}}", &store).unwrap(),
            "[taylor]"
        );
    }

    #[test]
    fn test_render_helper_output_escaping() {
        let engine = Engine::default()
            .with_helper_must("text", |_body: Body, _context: &mut Context, _args: &str| {
                Ok(Rendered::Text("<b>".to_owned()))
            })
            .with_helper_must("safe", |_body: Body, _context: &mut Context, _args: &str| {
                Ok(Rendered::Safe("<b>".to_owned()))
            });
        let store = Store::new();

        assert_eq!(engine.render("{{text}}", &store).unwrap(), "&lt;b&gt;");
        assert_eq!(engine.render("{{{text}}}", &store).unwrap(), "<b>");
        assert_eq!(engine.render("{{safe}}", &store).unwrap(), "<b>");
    }

    #[test]
    fn test_render_helper_raw_arguments() {
        let engine = Engine::default().with_helper_must("echo", |_body: Body, _context: &mut Context, args: &str| {
            Ok(Rendered::Text(args.to_owned()))
        });
        let store = Store::new();

        assert_eq!(
            engine.render(r#"{{echo 'a b'   c}}"#, &store).unwrap(),
            "'a b'   c"
        );
    }

    #[test]
    fn test_render_helper_shadows_value() {
        let engine = Engine::default().with_helper_must("name", |_body: Body, _context: &mut Context, _args: &str| {
            Ok(Rendered::Text("helper".to_owned()))
        });
        let store = Store::new().with_must("name", "value");

        assert_eq!(engine.render("{{name}}", &store).unwrap(), "helper");
    }

    #[test]
    fn test_render_strict_missing_variable() {
        let engine = Engine::default().with_strict(true);
        let result = engine.render("{{missing}}", &Store::new());

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_render_strict_sections_stay_lenient() {
        // Blocks over missing names render as empty, strict mode only
        // applies to output positions.
        let engine = Engine::default().with_strict(true);
        let result = engine.render("{{#missing}}x{{/missing}}", &Store::new());

        assert_eq!(result.unwrap(), "");
    }
}
