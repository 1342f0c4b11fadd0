use json_docstore::JsonStore;
use serde_json::json;

fn main() -> Result<(), json_docstore::Error> {
    let path = std::env::temp_dir().join("json_docstore_example_basic.json");
    let db = JsonStore::open(&path)?;

    // set / get / has
    db.set("apples", json!(3))?;
    db.set("fruits", json!(["apple", "banana", "apple"]))?;
    db.set("owner", json!({"name": "jax", "since": 2024}))?;
    println!("apples  = {:?}", db.get("apples"));
    println!("has pears? {}", db.has("pears"));

    // arithmetic
    let apples = db.math("apples", "+", 2)?;
    println!("apples after +2 = {apples}");

    // shape-checked helpers
    db.delete("fruits", &json!("apple"))?;
    println!("fruits = {:?}", db.get("fruits"));
    println!("owner.name = {:?}", db.fetch_object("owner", "name")?);
    println!("fruits[0] = {:?}", db.fetch_array("fruits", 0)?);
    db.delete_key("owner", "since")?;

    // shape mismatch is an error, not a silent no-op
    if let Err(e) = db.delete("apples", &json!(1)) {
        println!("expected error: {e} (shape mismatch: {})", e.is_shape_mismatch());
    }

    println!("all = {}", serde_json::Value::Object(db.all()));

    db.clear()?;
    println!("after clear: len = {}", db.len());

    db.destroy()?;
    Ok(())
}
