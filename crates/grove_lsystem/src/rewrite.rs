use std::collections::{BTreeSet, HashMap};

use crate::error::{LSystemError, Result};

/// The set of symbols a grammar is allowed to rewrite
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alphabet {
    symbols: BTreeSet<char>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Self {
        Self {
            symbols: symbols.chars().collect(),
        }
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Context-free productions, one replacement per symbol.
///
/// Keys are checked when a rule is inserted, so a `RuleSet` that exists is
/// always well formed and rewriting itself cannot fail.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    alphabet: Option<Alphabet>,
    rules: HashMap<char, String>,
}

impl RuleSet {
    /// Rules over any symbol
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules restricted to the symbols of `alphabet`
    pub fn with_alphabet(alphabet: Alphabet) -> Self {
        Self {
            alphabet: Some(alphabet),
            rules: HashMap::new(),
        }
    }

    /// Build a rule set from `(key, replacement)` pairs, stopping at the first bad key
    pub fn from_pairs<'a, I>(alphabet: Option<Alphabet>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rules = Self {
            alphabet,
            rules: HashMap::new(),
        };
        for (key, replacement) in pairs {
            rules.insert(key, replacement)?;
        }
        Ok(rules)
    }

    /// Add or replace the production for `key`
    pub fn insert(&mut self, key: &str, replacement: &str) -> Result<()> {
        let mut chars = key.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(symbol), None) => symbol,
            (None, _) => {
                return Err(LSystemError::InvalidRule {
                    key: key.to_string(),
                    reason: "key is empty".into(),
                })
            }
            (Some(_), Some(_)) => {
                return Err(LSystemError::InvalidRule {
                    key: key.to_string(),
                    reason: format!("key must be a single symbol, got {} symbols", key.chars().count()),
                })
            }
        };

        if let Some(alphabet) = &self.alphabet {
            if !alphabet.contains(symbol) {
                return Err(LSystemError::InvalidRule {
                    key: key.to_string(),
                    reason: "symbol is not in the alphabet".into(),
                });
            }
        }

        self.rules.insert(symbol, replacement.to_string());
        Ok(())
    }

    pub fn get(&self, symbol: char) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    pub fn alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Apply `rules` to `axiom` for `generations` passes.
///
/// Each pass reads only the previous generation and writes a fresh string,
/// so replacement text is never rescanned within the same pass.
pub fn rewrite(axiom: &str, rules: &RuleSet, generations: u32) -> String {
    let mut current = axiom.to_string();

    for _ in 0..generations {
        if rules.is_empty() {
            break;
        }
        current = rewrite_once(&current, rules);
    }

    current
}

fn rewrite_once(current: &str, rules: &RuleSet) -> String {
    let mut next = String::with_capacity(current.len() * 2);

    for ch in current.chars() {
        match rules.get(ch) {
            Some(replacement) => next.push_str(replacement),
            None => next.push(ch),
        }
    }

    next
}

/// An axiom with its productions
#[derive(Debug, Clone)]
pub struct LSystem {
    pub axiom: String,
    pub rules: RuleSet,
}

impl LSystem {
    pub fn new(axiom: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            axiom: axiom.into(),
            rules,
        }
    }

    pub fn expand(&self, generations: u32) -> String {
        let expanded = rewrite(&self.axiom, &self.rules, generations);
        log::debug!(
            "Expanded L-system {:?} over {} generations to {} symbols",
            self.axiom,
            generations,
            expanded.chars().count()
        );
        expanded
    }

    /// Every generation from the axiom onwards, lazily
    pub fn generations(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::successors(Some(self.axiom.clone()), move |current| Some(rewrite_once(current, &self.rules)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_tree_rules() -> RuleSet {
        RuleSet::from_pairs(None, [("0", "1[0]0"), ("1", "11")]).unwrap()
    }

    #[test]
    fn test_first_generation() {
        assert_eq!(rewrite("0", &binary_tree_rules(), 1), "1[0]0");
    }

    #[test]
    fn test_second_generation_uses_previous_string_only() {
        assert_eq!(rewrite("0", &binary_tree_rules(), 2), "11[1[0]0]1[0]0");
    }

    #[test]
    fn test_zero_generations_is_axiom() {
        assert_eq!(rewrite("0", &binary_tree_rules(), 0), "0");
    }

    #[test]
    fn test_empty_rules_is_identity() {
        let rules = RuleSet::new();
        for n in 0..5 {
            assert_eq!(rewrite("F[+F]X", &rules, n), "F[+F]X");
        }
    }

    #[test]
    fn test_unmatched_symbols_pass_through() {
        let rules = RuleSet::from_pairs(None, [("F", "FF")]).unwrap();
        assert_eq!(rewrite("F+X", &rules, 2), "FFFF+X");
    }

    #[test]
    fn test_rejects_multi_symbol_key() {
        let mut rules = RuleSet::new();
        let err = rules.insert("FF", "F").unwrap_err();
        assert!(matches!(err, LSystemError::InvalidRule { ref key, .. } if key == "FF"));
        assert!(rules.insert("", "F").is_err());
        assert!(rules.is_empty());
    }

    #[test]
    fn test_rejects_key_outside_alphabet() {
        let mut rules = RuleSet::with_alphabet(Alphabet::new("01[]"));
        assert!(rules.insert("0", "1[0]0").is_ok());
        assert!(matches!(rules.insert("F", "FF"), Err(LSystemError::InvalidRule { .. })));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_generations_iterator() {
        let system = LSystem::new("0", binary_tree_rules());
        let first: Vec<String> = system.generations().take(3).collect();
        assert_eq!(first, vec!["0", "1[0]0", "11[1[0]0]1[0]0"]);
        assert_eq!(system.expand(2), first[2]);
    }

    #[test]
    fn test_length_growth() {
        let rules = RuleSet::from_pairs(None, [("F", "FF")]).unwrap();
        assert_eq!(rewrite("F", &rules, 6).len(), 64);
    }
}
