use serde_json::Value;
use t2t::{Transfer, Transformer};

use crate::config::JsonArgs;
use crate::error::DemoError;

const SAMPLE: &str = r#"
{
    "kind": "Car",
    "doors": 4,
    "wheels": 4
}"#;

#[derive(Debug, Default, Transfer)]
pub struct KindGetter {
    #[transfer(json = "kind")]
    pub kind: String,
}

#[derive(Debug, Default, Transfer)]
pub struct Car {
    #[transfer(json = "kind")]
    pub kind: String,
    #[transfer(json = "doors")]
    pub doors: i64,
    #[transfer(json = "wheels")]
    pub wheels: i64,
}

pub fn run(t: &Transformer, args: JsonArgs) -> Result<(), DemoError> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| DemoError::Read {
            path: path.clone(),
            source,
        })?,
        None => SAMPLE.to_string(),
    };
    let document: Value = serde_json::from_str(&text)?;

    let t = t.with_tag_name(t2t::hooks::JSON_TAG);

    let mut getter = KindGetter::default();
    t.transfer(&document, &mut getter)?;
    tracing::info!(kind = %getter.kind, "document kind");

    let mut car = Car::default();
    t.transfer(&document, &mut car)?;
    tracing::info!(?car, "transferred document into record");
    Ok(())
}
