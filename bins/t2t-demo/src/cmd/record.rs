use std::collections::HashMap;

use t2t::{Transfer, Transformer};

use crate::error::DemoError;

#[derive(Debug, Default, Transfer)]
pub struct Source {
    pub int: i64,
    pub flag: bool,
    pub map: HashMap<String, f64>,
    pub children: HashMap<String, Source>,
}

#[derive(Debug, Default, Transfer)]
pub struct Target {
    pub int: i64,
    pub flag: bool,
    pub map: HashMap<String, f64>,
    pub children: HashMap<String, Target>,
}

pub fn run(t: &Transformer) -> Result<(), DemoError> {
    let source = Source {
        int: 999,
        flag: true,
        map: HashMap::from([("a".to_string(), 0.5), ("b".to_string(), 1.5)]),
        children: HashMap::from([(
            "haha".to_string(),
            Source {
                int: 555,
                ..Default::default()
            },
        )]),
    };

    let mut target = Target::default();
    t.transfer(&source, &mut target)?;
    tracing::info!(?source, "source");
    tracing::info!(?target, "target");
    Ok(())
}
