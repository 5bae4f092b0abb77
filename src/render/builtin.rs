//! Block helpers registered on every default `Engine`.

use super::Body;
use crate::{
    context::is_truthy,
    helper::Rendered,
    log::Error,
    Context,
};
use serde_json::Value;

/// The `if` block helper.
///
/// `{{#if path}} ... {{/if}}` renders the body once when the path resolves
/// to a truthy value. The body shares the surrounding scope.
pub(crate) fn if_(body: Body, context: &mut Context, args: &str) -> Result<Rendered, Error> {
    let value = context.get(args, false)?;
    if is_truthy(&value) {
        return Ok(Rendered::Safe(body.render(context)?));
    }

    Ok(Rendered::Safe(String::new()))
}

/// The `unless` block helper, the inverse of `if`.
pub(crate) fn unless(body: Body, context: &mut Context, args: &str) -> Result<Rendered, Error> {
    let value = context.get(args, false)?;
    if !is_truthy(&value) {
        return Ok(Rendered::Safe(body.render(context)?));
    }

    Ok(Rendered::Safe(String::new()))
}

/// The `with` block helper.
///
/// `{{#with path}} ... {{/with}}` renders the body once with the resolved
/// value pushed as the current scope.
pub(crate) fn with(body: Body, context: &mut Context, args: &str) -> Result<Rendered, Error> {
    context.with(args)?;
    let result = body.render(context);
    context.pop();

    Ok(Rendered::Safe(result?))
}

/// The `each` block helper.
///
/// `{{#each path}} ... {{/each}}` renders the body once per element of an
/// array or entry of an object, with the element pushed as the current
/// scope and `@index`/`@key` describing the position. Objects iterate in
/// insertion order. Any other value renders nothing.
pub(crate) fn each(body: Body, context: &mut Context, args: &str) -> Result<Rendered, Error> {
    let mut buffer = String::new();
    match context.get(args, false)? {
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                step(&body, context, item, index, Value::from(index), &mut buffer)?;
            }
        }
        Value::Object(object) => {
            for (index, (key, item)) in object.into_iter().enumerate() {
                step(&body, context, item, index, Value::String(key), &mut buffer)?;
            }
        }
        _ => {}
    }

    Ok(Rendered::Safe(buffer))
}

/// Render one loop step with the scope and position stacks adjusted.
fn step(
    body: &Body,
    context: &mut Context,
    item: Value,
    index: usize,
    key: Value,
    buffer: &mut String,
) -> Result<(), Error> {
    context.push(item);
    context.push_index(index);
    context.push_key(key);
    let result = body.render(context);
    context.pop_key();
    context.pop_index();
    context.pop();
    buffer.push_str(&result?);

    Ok(())
}
