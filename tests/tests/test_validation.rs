// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.


use graphwire::{Error, FieldError, Graphwire, Obj};
use models::{Circle, Customer, Drawing, Order, Product, Shape};
use serde_json::{json, Value};

fn fields(err: &Error) -> Vec<String> {
    err.field_errors().into_iter().map(|e| e.field).collect()
}

#[test]
fn test_missing_required_fields_reported_together() {
    let graphwire = Graphwire::default();
    let node = json!({"__type": "Customer", "__id": 1, "email": "x@y.z"});
    let err = graphwire.from_value::<Obj<Customer>>(&node).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.field_errors(),
        vec![
            FieldError::new("name", "is required"),
            FieldError::new("status", "is required"),
        ]
    );
    assert_eq!(
        err.to_string(),
        "validation failed: name: is required; status: is required"
    );
}

#[test]
fn test_nested_paths() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Order", "__id": 1, "number": 5,
        "customer": {"__type": "Customer", "__id": 2, "status": "active"},
        "items": [
            {"__type": "Product", "__id": 3, "sku": "A", "price": 1.0},
            {"__type": "Product", "__id": 4, "price": 2.0}
        ]
    });
    let err = graphwire.from_value::<Obj<Order>>(&node).unwrap_err();
    assert_eq!(fields(&err), vec!["customer.name", "items[1].sku"]);
}

#[test]
fn test_wrong_node_kinds() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Order", "__id": 1,
        "number": "five",
        "customer": 5,
        "items": {"not": "a list"}
    });
    let err = graphwire.from_value::<Obj<Order>>(&node).unwrap_err();
    let errors = err.field_errors();
    assert_eq!(fields(&err), vec!["number", "customer", "items"]);
    assert_eq!(
        errors[1].message,
        "expected `Customer` object, got number"
    );
    assert_eq!(errors[2].message, "expected array, got object");
}

#[test]
fn test_type_tag_mismatch() {
    let graphwire = Graphwire::default();
    let node = json!({"__type": "Product", "__id": 1, "name": "Ada", "status": "active"});
    let err = graphwire.from_value::<Obj<Customer>>(&node).unwrap_err();
    assert_eq!(
        err.field_errors(),
        vec![FieldError::new("__type", "expected `Customer`, got `Product`")]
    );
}

#[test]
fn test_unknown_string_enum_value() {
    let graphwire = Graphwire::default();
    let node = json!({"__type": "Customer", "__id": 1, "name": "Ada", "status": "deleted"});
    let err = graphwire.from_value::<Obj<Customer>>(&node).unwrap_err();
    let errors = err.field_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "status");
    assert_eq!(
        errors[0].message,
        "expected one of `active`, `suspended`, got `deleted`"
    );
}

#[test]
fn test_type_level_check() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Order", "__id": 1, "number": 5,
        "customer": {"__type": "Customer", "__id": 2, "name": "Ada", "status": "active"},
        "items": [{"__type": "Product", "__id": 3, "sku": "A", "price": -1.0}]
    });
    let err = graphwire.from_value::<Obj<Order>>(&node).unwrap_err();
    assert_eq!(
        err.field_errors(),
        vec![FieldError::new("items[0].price", "must not be negative")]
    );
}

#[test]
fn test_field_validators() {
    let graphwire = Graphwire::default().validator(|tag: &str, field: &str, node: &Value| {
        let bad_email = tag == "Customer"
            && field == "email"
            && node.as_str().is_some_and(|email| !email.contains('@'));
        if bad_email {
            vec!["must contain `@`".to_string()]
        } else {
            Vec::new()
        }
    });
    let node = json!({
        "__type": "Order", "__id": 1, "number": 5,
        "customer": {"__type": "Customer", "__id": 2, "name": "Ada", "status": "active", "email": "nope"},
        "items": [{"__type": "Product", "__id": 3, "sku": "A"}]
    });
    let err = graphwire.from_value::<Obj<Order>>(&node).unwrap_err();
    assert_eq!(
        err.field_errors(),
        vec![
            FieldError::new("customer.email", "must contain `@`"),
            FieldError::new("items[0].price", "is required"),
        ]
    );

    let mut fixed = node.clone();
    fixed["customer"]["email"] = json!("ada@example.com");
    fixed["items"][0]["price"] = json!(3.5);
    let order: Obj<Order> = graphwire.from_value(&fixed).unwrap();
    assert_eq!(order.borrow().number, 5);
}

#[test]
fn test_several_validators_merge() {
    let graphwire = Graphwire::default()
        .validator(|_: &str, field: &str, _: &Value| {
            if field == "sku" {
                vec!["first".to_string()]
            } else {
                Vec::new()
            }
        })
        .validator(|_: &str, field: &str, _: &Value| {
            if field == "sku" {
                vec!["second".to_string()]
            } else {
                Vec::new()
            }
        });
    let node = json!({"__type": "Product", "__id": 1, "sku": "A", "price": 1.0});
    let err = graphwire.from_value::<Obj<Product>>(&node).unwrap_err();
    assert_eq!(
        err.field_errors(),
        vec![FieldError::new("sku", "first"), FieldError::new("sku", "second")]
    );
}

#[test]
fn test_union_dispatch_and_shared_variant() {
    let graphwire = Graphwire::default();
    let circle = Obj::new(Circle { radius: 2.0 });
    let drawing = Obj::new(Drawing {
        title: "logo".to_string(),
        shapes: vec![
            Shape::Circle(circle.clone()),
            Shape::Square(Obj::new(models::Square { side: 1.0 })),
        ],
        highlight: Some(Shape::Circle(circle.clone())),
    });
    let node = graphwire.to_value(&drawing).unwrap();
    assert_eq!(node["highlight"], json!({"__ref": 2}));

    let back: Obj<Drawing> = graphwire.from_value(&node).unwrap();
    assert_eq!(back, drawing);
    let back = back.borrow();
    match (&back.shapes[0], &back.highlight) {
        (Shape::Circle(a), Some(Shape::Circle(b))) => assert!(Obj::ptr_eq(a, b)),
        other => panic!("unexpected shapes {other:?}"),
    }
}

#[test]
fn test_unknown_union_tag() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Drawing", "__id": 1, "title": "t",
        "shapes": [{"__type": "Triangle", "__id": 2, "base": 1.0}]
    });
    let err = graphwire.from_value::<Obj<Drawing>>(&node).unwrap_err();
    assert!(matches!(err, Error::UnknownTag(_)));
    assert_eq!(
        err.to_string(),
        "unknown Shape variant `Triangle`, expected one of: Circle, Square"
    );
}

#[test]
fn test_union_without_tag() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Drawing", "__id": 1, "title": "t",
        "shapes": [{"radius": 1.0}, 4]
    });
    let err = graphwire.from_value::<Obj<Drawing>>(&node).unwrap_err();
    assert_eq!(fields(&err), vec!["shapes[0].__type", "shapes[1]"]);
}

#[test]
fn test_union_forward_reference() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Drawing", "__id": 1, "title": "t",
        "shapes": [{"__ref": 2}, {"__type": "Circle", "__id": 2, "radius": 1.0}]
    });
    let err = graphwire.from_value::<Obj<Drawing>>(&node).unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));
}

#[test]
fn test_parse_error() {
    let graphwire = Graphwire::default();
    let err = graphwire
        .from_stringified_json::<Obj<Product>>("{\"__type\": \"Product\",")
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(!err.is_validation());
    let errors = err.field_errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].field.is_empty());
    assert!(errors[0].message.starts_with("invalid JSON"));
}

#[test]
fn test_errors_do_not_leak_partial_values() {
    let graphwire = Graphwire::default();
    let node = json!([
        {"__type": "Product", "__id": 1, "sku": "A", "price": 1.0},
        {"__type": "Product", "__id": 2, "sku": "B"}
    ]);
    let result: Result<Vec<Obj<Product>>, Error> = graphwire.from_value(&node);
    let err = result.unwrap_err();
    assert_eq!(fields(&err), vec!["[1].price"]);
}

#[test]
fn test_many_invalid_siblings_all_reported() {
    // each element fails on its own; none of them may count against depth
    let graphwire = Graphwire::default().max_depth(4);
    let items: Vec<Value> = (1..=600)
        .map(|id| json!({"__type": "Product", "__id": id, "price": 1.0}))
        .collect();
    let err = graphwire
        .from_value::<Vec<Obj<Product>>>(&Value::Array(items))
        .unwrap_err();
    assert!(err.is_validation());
    let errors = err.field_errors();
    assert_eq!(errors.len(), 600);
    assert_eq!(errors[0], FieldError::new("[0].sku", "is required"));
    assert_eq!(errors[599], FieldError::new("[599].sku", "is required"));
}

#[test]
fn test_invalid_siblings_inside_composite() {
    let graphwire = Graphwire::default().max_depth(3);
    let items: Vec<Value> = (0..10)
        .map(|i| json!({"__type": "Product", "__id": i + 3, "sku": "A"}))
        .collect();
    let node = json!({
        "__type": "Order", "__id": 1, "number": 5,
        "customer": {"__type": "Customer", "__id": 2, "name": "Ada", "status": "active"},
        "items": items
    });
    let err = graphwire.from_value::<Obj<Order>>(&node).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field_errors().len(), 10);
    assert_eq!(fields(&err)[9], "items[9].price");
}

#[test]
fn test_reference_to_invalid_instance() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Roster", "__id": 1,
        "members": [
            {"__type": "Person", "__id": 2},
            {"__ref": 2}
        ]
    });
    let err = graphwire.from_value::<Obj<models::Roster>>(&node).unwrap_err();
    assert_eq!(
        err.field_errors(),
        vec![FieldError::new("members[0].name", "is required")]
    );

    let node = json!({
        "__type": "Drawing", "__id": 1, "title": "t",
        "shapes": [{"__type": "Circle", "__id": 2}, {"__ref": 2}],
        "highlight": {"__ref": 2}
    });
    let err = graphwire.from_value::<Obj<Drawing>>(&node).unwrap_err();
    assert_eq!(
        err.field_errors(),
        vec![FieldError::new("shapes[0].radius", "is required")]
    );
}
