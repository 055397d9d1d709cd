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


use graphwire::{DeserializeOptions, Error, Graphwire, Obj};
use models::{Order, Roster};
use serde_json::json;

fn order_node() -> serde_json::Value {
    json!({
        "__type": "Order", "__id": 1, "number": 9,
        "customer": {"__ref": 2},
        "items": [
            {"__ref": 3},
            {"__type": "Product", "__id": 3, "sku": "A", "price": 1.0}
        ],
        "note": {"__type": "ignored"}
    })
}

fn roster_node() -> serde_json::Value {
    json!({
        "__type": "Roster", "__id": 1,
        "members": [
            {"__type": "Person", "__id": 2, "name": "a", "friend": {"__ref": 3}},
            {"__type": "Person", "__id": 3, "name": "b", "friend": {"__ref": 2}}
        ]
    })
}

#[test]
fn test_not_frozen_by_default() {
    let graphwire = Graphwire::default();
    let roster: Obj<Roster> = graphwire.from_value(&roster_node()).unwrap();
    assert!(!roster.is_frozen());
    roster
        .update(|r| r.members.truncate(1))
        .unwrap();
    assert_eq!(roster.borrow().members.len(), 1);
}

#[test]
fn test_freeze_covers_patched_fields() {
    let graphwire = Graphwire::default();
    let options = DeserializeOptions::new().freeze(true);
    let roster: Obj<Roster> = graphwire.from_value_with(&roster_node(), options).unwrap();

    assert!(roster.is_frozen());
    let members = roster.borrow().members.clone();
    for member in &members {
        assert!(member.is_frozen());
        assert!(matches!(member.borrow_mut(), Err(Error::Frozen(_))));
    }
    // `a.friend` was only filled by the patch pass
    assert!(members[0].borrow().friend.points_to(&members[1]));
    assert!(members[1].borrow().friend.points_to(&members[0]));

    let err = roster.update(|r| r.members.clear()).unwrap_err();
    assert!(matches!(err, Error::Frozen(_)));
    assert_eq!(roster.borrow().members.len(), 2);
}

#[test]
fn test_freeze_reaches_every_instance() {
    let graphwire = Graphwire::default().freeze(true);
    let node = json!({
        "__type": "Order", "__id": 1, "number": 9,
        "customer": {"__type": "Customer", "__id": 2, "name": "Ada", "status": "active"},
        "items": [
            {"__ref": 3},
            {"__type": "Product", "__id": 3, "sku": "A", "price": 1.0}
        ]
    });
    let order: Obj<Order> = graphwire.from_value(&node).unwrap();
    assert!(order.is_frozen());
    let order = order.borrow();
    let customer = order.customer.get().unwrap();
    assert!(customer.is_frozen());
    assert!(customer.update(|c| c.name.clear()).is_err());
    for item in &order.items {
        let product = item.get().unwrap();
        assert!(product.is_frozen());
        assert!(product.borrow_mut().is_err());
    }
}

#[test]
fn test_per_call_override() {
    let graphwire = Graphwire::default().freeze(true);
    let roster: Obj<Roster> = graphwire
        .from_value_with(&roster_node(), DeserializeOptions::new())
        .unwrap();
    assert!(!roster.is_frozen());

    let roster: Obj<Roster> = graphwire.from_value(&roster_node()).unwrap();
    assert!(roster.is_frozen());
}

#[test]
fn test_failed_call_returns_nothing_to_freeze() {
    let graphwire = Graphwire::default().freeze(true);
    let err = graphwire
        .from_value::<Obj<Order>>(&order_node())
        .unwrap_err();
    // the `{"__type": "ignored"}` note is not a string
    assert!(err.is_validation());
}

#[test]
fn test_facade_freeze_option() {
    let json = roster_node().to_string();
    let roster: Obj<Roster> = graphwire::from_stringified_json(
        &json,
        Some(DeserializeOptions::new().freeze(true)),
    )
    .unwrap();
    assert!(roster.is_frozen());

    let roster: Obj<Roster> = graphwire::from_stringified_json(&json, None).unwrap();
    assert!(!roster.is_frozen());
}
