use serde::Serialize;

/// How a symbolic value string is translated into the byte value of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ValueKind {
    /// Any value is accepted.
    #[default]
    Unconstrained,
    Range {
        min: i64,
        max: i64,
    },
    /// Named sub-ranges, e.g. the slots of a gobo wheel.
    Discrete(Vec<DiscreteValue>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscreteValue {
    pub name: String,
    pub min: u64,
    pub max: u64,
}

impl ValueKind {
    /// Find the named discrete value, if this is a discrete value kind.
    pub fn discrete(&self, name: &str) -> Option<&DiscreteValue> {
        match self {
            ValueKind::Discrete(values) => values.iter().find(|v| v.name == name),
            ValueKind::Unconstrained | ValueKind::Range { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_discrete_values_by_name() {
        let kind = ValueKind::Discrete(vec![
            DiscreteValue {
                name: "open".into(),
                min: 0,
                max: 7,
            },
            DiscreteValue {
                name: "star".into(),
                min: 8,
                max: 15,
            },
        ]);
        assert_eq!(kind.discrete("star").map(|v| v.min), Some(8));
        assert_eq!(kind.discrete("moon"), None);
        assert_eq!(ValueKind::Range { min: 0, max: 255 }.discrete("star"), None);
    }

    #[test]
    fn serializes_with_type_tag() -> anyhow::Result<()> {
        let range = serde_yaml::to_value(ValueKind::Range { min: 0, max: 100 })?;
        assert_eq!(range["type"], "range");
        assert_eq!(range["values"]["max"], 100);

        let discrete = serde_yaml::to_value(ValueKind::Discrete(vec![DiscreteValue {
            name: "star".into(),
            min: 8,
            max: 15,
        }]))?;
        assert_eq!(discrete["type"], "discrete");
        assert_eq!(discrete["values"][0]["name"], "star");
        assert_eq!(discrete["values"][0]["min"], 8);
        Ok(())
    }
}
