use json_docstore::JsonStore;
use serde_json::json;

fn main() -> Result<(), json_docstore::Error> {
    let path = std::env::temp_dir().join("json_docstore_example_builder.json");

    // compact JSON + custom backup extension
    let db = JsonStore::builder(&path)
        .pretty(false)
        .backup_extension("snapshot")
        .build()?;

    db.set("name", json!("json-docstore"))?;
    db.set("version", json!("0.1.0"))?;
    let backup = db.create_backup()?;
    println!("backup written to {}", backup.display());

    db.set("version", json!("broken"))?;
    db.restore_backup()?;
    println!("version after restore = {:?}", db.get("version"));

    let contents = std::fs::read_to_string(db.path())?;
    println!("On-disk JSON:\n{contents}");

    println!("\nDebug output: {db:?}");

    db.destroy()?;
    let _ = std::fs::remove_file(backup);
    Ok(())
}
