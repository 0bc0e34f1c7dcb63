use auditdiff_core::{Descriptor, FieldMap, Value};

pub const STACK_NAME: &str = "Foo Stack Table";

/// Scalar-only map: `{field: "Simple field"}`
#[allow(dead_code)]
pub fn simple_descriptor() -> Descriptor {
    Descriptor::object(FieldMap::new().label("field", "Simple field"))
}

#[allow(dead_code)]
pub fn simple(field: &str) -> Value {
    Value::object([("field", field)])
}

/// Nested object without a name
#[allow(dead_code)]
pub fn bar_descriptor() -> Descriptor {
    Descriptor::object(
        FieldMap::new()
            .label("title", "Magic Title")
            .label("user", "Magic User"),
    )
}

/// Array elements keyed by `id`, identified by `name`
#[allow(dead_code)]
pub fn stack_descriptor() -> Descriptor {
    Descriptor::array(
        FieldMap::new()
            .label("name", "Stack item Name")
            .label("id", "Key"),
    )
    .named(STACK_NAME)
    .with_identity_field("name")
    .with_key_field("id")
}

/// Root descriptor mixing scalar, object and array fields
#[allow(dead_code)]
pub fn foo_descriptor() -> Descriptor {
    Descriptor::object(
        FieldMap::new()
            .nested("bar", bar_descriptor())
            .label("disabled", "Is Disabled")
            .label("edited", "Is Edited")
            .label("title", "Magic Title")
            .nested("stack", stack_descriptor()),
    )
}

#[allow(dead_code)]
pub fn stack_item(id: i64, name: &str) -> Value {
    Value::object([("id", Value::from(id)), ("name", Value::from(name))])
}

/// A `Foo` with an empty stack and nothing else set
#[allow(dead_code)]
pub fn foo() -> Value {
    foo_with_stack(Vec::new())
}

#[allow(dead_code)]
pub fn foo_with_stack(stack: Vec<Value>) -> Value {
    Value::object([("stack", Value::Array(stack))])
}

#[allow(dead_code)]
pub fn foo_with_bar_user(user: &str) -> Value {
    Value::object([
        ("stack", Value::Array(Vec::new())),
        ("bar", Value::object([("user", user)])),
    ])
}
