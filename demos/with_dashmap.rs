use dashmap::DashMap;
use json_docstore::JsonStore;
use serde_json::{json, Value};

fn main() -> Result<(), json_docstore::Error> {
    let path = std::env::temp_dir().join("json_docstore_example_dashmap.json");

    let db = JsonStore::builder(&path)
        .backend::<DashMap<String, Value>>()
        .build()?;

    db.set("counter", json!(0))?;
    for _ in 0..10 {
        db.math("counter", "+", 1)?;
    }
    println!("counter = {:?}", db.get("counter"));

    db.set("x", json!([1, 2, 1]))?;
    db.set("y", json!(1))?;
    let removed = db.delete_each(&json!(1))?;
    println!("delete_each removed {removed}, keys = {:?}", db.keys());

    db.destroy()?;
    Ok(())
}
