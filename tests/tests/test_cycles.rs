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


use graphwire::{Error, Graphwire, Link, Obj};
use models::{Order, Person, Product, Roster, TreeNode};
use serde_json::json;

fn person(name: &str) -> Obj<Person> {
    Obj::new(Person {
        name: name.to_string(),
        friend: Link::unset(),
    })
}

#[test]
fn test_self_reference() {
    let graphwire = Graphwire::default();
    let solo = person("solo");
    solo.borrow_mut().unwrap().friend = Link::new(&solo);

    let json = graphwire.to_stringified_json(&solo).unwrap();
    assert_eq!(
        json,
        r#"{"__type":"Person","__id":1,"name":"solo","friend":{"__ref":1}}"#
    );

    let back: Obj<Person> = graphwire.from_stringified_json(&json).unwrap();
    assert!(back.borrow().friend.points_to(&back));
    assert_eq!(back.borrow().name, "solo");
}

#[test]
fn test_mutual_cycle_round_trip() {
    let graphwire = Graphwire::default();
    let a = person("a");
    let b = person("b");
    a.borrow_mut().unwrap().friend = Link::new(&b);
    b.borrow_mut().unwrap().friend = Link::new(&a);

    let node = graphwire.to_value(&a).unwrap();
    assert_eq!(
        node,
        json!({
            "__type": "Person", "__id": 1, "name": "a",
            "friend": {"__type": "Person", "__id": 2, "name": "b", "friend": {"__ref": 1}}
        })
    );

    let back_a: Obj<Person> = graphwire.from_value(&node).unwrap();
    let back_b = back_a.borrow().friend.get().unwrap();
    assert_eq!(back_b.borrow().name, "b");
    assert!(back_b.borrow().friend.points_to(&back_a));
}

#[test]
fn test_parent_back_pointers() {
    let graphwire = Graphwire::default();
    let root = TreeNode::root("root");
    let left = TreeNode::add_child(&root, "left");
    TreeNode::add_child(&root, "right");
    TreeNode::add_child(&left, "leaf");

    let json = graphwire.to_stringified_json(&root).unwrap();
    assert_eq!(json.matches("\"__id\"").count(), 4);
    assert_eq!(json.matches("\"__ref\"").count(), 3);

    let back: Obj<TreeNode> = graphwire.from_stringified_json(&json).unwrap();
    let root_ref = back.borrow();
    assert!(!root_ref.parent.is_set());
    assert_eq!(root_ref.children.len(), 2);
    for child in &root_ref.children {
        assert!(child.borrow().parent.points_to(&back));
    }
    let left = &root_ref.children[0];
    let left_ref = left.borrow();
    let leaf = &left_ref.children[0];
    assert_eq!(leaf.borrow().label, "leaf");
    assert!(leaf.borrow().parent.points_to(left));
}

#[test]
fn test_cyclic_graph_debug_terminates() {
    let solo = person("solo");
    solo.borrow_mut().unwrap().friend = Link::new(&solo);
    let printed = format!("{:?}", *solo.borrow());
    assert!(printed.starts_with("Person { name: \"solo\", friend: Link(Obj {"));
}

#[test]
fn test_mutual_forward_reference() {
    // `a` points at `b` before `b`'s node appears
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Roster", "__id": 1,
        "members": [
            {"__type": "Person", "__id": 2, "name": "a", "friend": {"__ref": 3}},
            {"__type": "Person", "__id": 3, "name": "b", "friend": {"__ref": 2}}
        ]
    });
    let roster: Obj<Roster> = graphwire.from_value(&node).unwrap();
    let roster = roster.borrow();
    let (a, b) = (&roster.members[0], &roster.members[1]);
    assert!(a.borrow().friend.points_to(b));
    assert!(b.borrow().friend.points_to(a));
}

#[test]
fn test_forward_reference_inside_array() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Order", "__id": 1, "number": 7,
        "customer": {"__type": "Customer", "__id": 2, "name": "Ada", "status": "active"},
        "items": [
            {"__ref": 4},
            {"__type": "Product", "__id": 3, "sku": "A", "price": 1.0},
            {"__type": "Product", "__id": 4, "sku": "B", "price": 2.0},
            {"__ref": 3}
        ]
    });
    let order: Obj<Order> = graphwire.from_value(&node).unwrap();
    let order = order.borrow();
    let items: Vec<Obj<Product>> = order.items.iter().map(|l| l.get().unwrap()).collect();
    assert_eq!(items.len(), 4);
    assert!(Obj::ptr_eq(&items[0], &items[2]));
    assert!(Obj::ptr_eq(&items[1], &items[3]));
    assert_eq!(items[0].borrow().sku, "B");
}

#[test]
fn test_root_forward_reference_rejected() {
    let graphwire = Graphwire::default();
    let err = graphwire
        .from_stringified_json::<Obj<Person>>(r#"{"__ref": 1}"#)
        .unwrap_err();
    assert!(matches!(err, Error::ForwardRoot(1)));
    assert!(err
        .to_string()
        .contains("root cannot be a forward reference"));

    let errors = err.field_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "");
}

#[test]
fn test_unresolved_reference() {
    let graphwire = Graphwire::default();
    let node = json!({"__type": "Person", "__id": 1, "name": "a", "friend": {"__ref": 9}});
    let err = graphwire.from_value::<Obj<Person>>(&node).unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));
    assert_eq!(
        err.to_string(),
        "friend: __ref 9 does not match any __id in the document"
    );
}

#[test]
fn test_duplicate_id() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Roster", "__id": 1,
        "members": [
            {"__type": "Person", "__id": 2, "name": "a"},
            {"__type": "Person", "__id": 2, "name": "b"}
        ]
    });
    let err = graphwire.from_value::<Obj<Roster>>(&node).unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));
    assert!(err.to_string().contains("__id 2 is defined twice"));
}

#[test]
fn test_reference_to_wrong_type() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Order", "__id": 1, "number": 7,
        "customer": {"__ref": 1},
        "items": []
    });
    let err = graphwire.from_value::<Obj<Order>>(&node).unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));
    assert!(err.to_string().contains("__ref 1 points to `Order`"));
}

#[test]
fn test_forward_reference_needs_link_slot() {
    // `members` holds `Obj<Person>`, which cannot wait for a patch
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Roster", "__id": 1,
        "members": [
            {"__ref": 2},
            {"__type": "Person", "__id": 2, "name": "a"}
        ]
    });
    let err = graphwire.from_value::<Obj<Roster>>(&node).unwrap_err();
    assert!(matches!(err, Error::InvalidRef(_)));
    let message = err.to_string();
    assert!(message.starts_with("members[0]: __ref 2 is a forward reference"));
}

#[test]
fn test_backward_reference_in_owned_slot() {
    let graphwire = Graphwire::default();
    let node = json!({
        "__type": "Roster", "__id": 1,
        "members": [
            {"__type": "Person", "__id": 2, "name": "a"},
            {"__ref": 2}
        ]
    });
    let roster: Obj<Roster> = graphwire.from_value(&node).unwrap();
    let roster = roster.borrow();
    assert!(Obj::ptr_eq(&roster.members[0], &roster.members[1]));
}

#[test]
fn test_malformed_reference_node() {
    let graphwire = Graphwire::default();
    let node = json!({"__type": "Person", "__id": 1, "name": "a", "friend": {"__ref": "one"}});
    let err = graphwire.from_value::<Obj<Person>>(&node).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field_errors()[0].field, "friend");

    let node = json!({"__type": "Person", "__id": 1, "name": "a", "friend": {"__ref": 1, "x": 2}});
    let err = graphwire.from_value::<Obj<Person>>(&node).unwrap_err();
    assert!(err.is_validation());
}
