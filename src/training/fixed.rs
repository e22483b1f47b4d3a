use std::fmt;

/// Rules deciding which features keep a fixed weight during training.
///
/// A rule either names a feature exactly or, when it ends with `*`, matches every
/// feature starting with what precedes the `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedWeightRules {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl FixedWeightRules {
    /// Creates a new set of rules.
    ///
    /// # Arguments
    /// * `rules` - Feature names or prefix patterns ending with `*`.
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut exact = Vec::new();
        let mut prefixes = Vec::new();

        for rule in rules {
            let mut rule = rule.into();
            if rule.ends_with('*') {
                rule.pop();
                prefixes.push(rule);
            } else {
                exact.push(rule);
            }
        }

        Self { exact, prefixes }
    }

    /// Whether `feature` matches any rule.
    pub fn is_fixed(&self, feature: &str) -> bool {
        self.exact.iter().any(|f| f == feature)
            || self.prefixes.iter().any(|p| feature.starts_with(p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }
}

impl fmt::Display for FixedWeightRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules: Vec<_> = self
            .exact
            .iter()
            .cloned()
            .chain(self.prefixes.iter().map(|p| format!("{p}*")))
            .collect();

        write!(f, "[{}]", rules.join(", "))
    }
}
