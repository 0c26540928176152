use std::collections::BTreeMap;

use t2t::{Dynamic, Key, Transfer, Transformer};

use crate::error::DemoError;

#[derive(Debug, Default, Transfer)]
pub struct Sample {
    #[transfer(t2t = "data")]
    pub data: i64,
    #[transfer(t2t = "str2")]
    pub text: String,
}

pub fn run(t: &Transformer) -> Result<(), DemoError> {
    let input = Dynamic::Map(BTreeMap::from([
        (Key::from("data"), Dynamic::I64(999)),
        (Key::from("str2"), Dynamic::from("hello")),
    ]));

    let mut sample = Sample::default();
    t.transfer(&input, &mut sample)?;
    tracing::info!(?sample, "transferred map into record");
    Ok(())
}
