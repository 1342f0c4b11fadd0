mod common;

use common::{fresh_store, temp_store_path};
use json_docstore::{Error, JsonStore, MathOp};
use serde_json::{json, Number};

#[test]
fn add_updates_and_persists() {
    let (_dir, path) = temp_store_path();
    {
        let db = JsonStore::open(&path).unwrap();
        db.set("counter", json!(10)).unwrap();
        assert_eq!(db.math("counter", "+", 5).unwrap(), Number::from(15));
        assert_eq!(db.get("counter"), Some(json!(15)));
    }
    let db = JsonStore::open(&path).unwrap();
    assert_eq!(db.get("counter"), Some(json!(15)));
}

#[test]
fn all_four_operators() {
    let (_dir, db) = fresh_store();
    db.set("n", json!(12)).unwrap();
    assert_eq!(db.math("n", "-", 2).unwrap(), Number::from(10));
    assert_eq!(db.math("n", "*", 3).unwrap(), Number::from(30));
    assert_eq!(db.math("n", "/", 4).unwrap().as_f64(), Some(7.5));
    assert_eq!(db.get("n"), Some(json!(7.5)));
}

#[test]
fn typed_apply_matches_math() {
    let (_dir, db) = fresh_store();
    db.set("n", json!(2.5)).unwrap();
    assert_eq!(db.apply("n", MathOp::Mul, 2).unwrap().as_f64(), Some(5.0));
}

#[test]
fn division_by_zero_leaves_value() {
    let (_dir, db) = fresh_store();
    db.set("counter", json!(10)).unwrap();
    assert_eq!(db.math("counter", "/", 0).unwrap_err(), Error::DivisionByZero);
    assert_eq!(db.math("counter", "/", 0.0).unwrap_err(), Error::DivisionByZero);
    assert_eq!(db.get("counter"), Some(json!(10)));
}

#[test]
fn zero_operand_is_fine_for_other_operators() {
    let (_dir, db) = fresh_store();
    db.set("counter", json!(10)).unwrap();
    assert_eq!(db.math("counter", "*", 0).unwrap(), Number::from(0));
}

#[test]
fn invalid_operator() {
    let (_dir, db) = fresh_store();
    db.set("counter", json!(10)).unwrap();
    assert_eq!(
        db.math("counter", "%", 3).unwrap_err(),
        Error::InvalidOperator("%".into())
    );
    assert_eq!(db.get("counter"), Some(json!(10)));
}

#[test]
fn padded_operator_is_rejected() {
    let (_dir, db) = fresh_store();
    db.set("counter", json!(10)).unwrap();
    for op in [" + ", "+ ", " /"] {
        assert_eq!(
            db.math("counter", op, 1).unwrap_err(),
            Error::InvalidOperator(op.into())
        );
    }
    assert_eq!(db.get("counter"), Some(json!(10)));
}

#[test]
fn non_numeric_target() {
    let (_dir, db) = fresh_store();
    db.set("name", json!("10")).unwrap();
    let err = db.math("name", "+", 1).unwrap_err();
    assert_eq!(err, Error::NotANumber("name".into()));
    assert!(err.is_arithmetic());
    assert_eq!(
        db.math("missing", "+", 1).unwrap_err(),
        Error::NotANumber("missing".into())
    );
}

#[test]
fn non_numeric_operand() {
    let (_dir, db) = fresh_store();
    db.set("n", json!(1)).unwrap();
    assert!(matches!(
        db.math("n", "+", "one").unwrap_err(),
        Error::NotANumber(_)
    ));
    assert_eq!(db.get("n"), Some(json!(1)));
}

#[test]
fn overflow_is_reported() {
    let (_dir, db) = fresh_store();
    db.set("big", json!(f64::MAX)).unwrap();
    assert_eq!(
        db.math("big", "*", 10).unwrap_err(),
        Error::NumericOverflow("big".into())
    );
    assert_eq!(db.get("big"), Some(json!(f64::MAX)));
}
