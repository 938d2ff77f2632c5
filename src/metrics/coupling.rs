// src/metrics/coupling.rs
//! Afferent and efferent coupling.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Coupling counts for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coupling {
    /// Afferent coupling (fan-in): modules that depend ON this module.
    afferent: usize,
    /// Efferent coupling (fan-out): modules this module depends ON.
    efferent: usize,
}

impl Coupling {
    #[must_use]
    pub fn new(afferent: usize, efferent: usize) -> Self {
        Self { afferent, efferent }
    }

    /// Instability Index: I = Cₑ / (Cₐ + Cₑ).
    ///
    /// A module nobody imports and that imports nothing sits at 0.5.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn instability(&self) -> f64 {
        let total = self.afferent + self.efferent;
        if total == 0 {
            return 0.5;
        }
        self.efferent as f64 / total as f64
    }

    /// Coupling score: 100 · e^(−k·Cₑ). 100 means no in-project imports.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self, decay_constant: f64) -> f64 {
        100.0 * (-decay_constant * self.efferent as f64).exp()
    }

    #[must_use] pub fn afferent(&self) -> usize { self.afferent }
    #[must_use] pub fn efferent(&self) -> usize { self.efferent }
}

/// Computes coupling counts for every module of a dependency map.
///
/// Modules that only appear as import targets get an entry too.
pub fn compute_coupling(dependencies: &BTreeMap<String, BTreeSet<String>>) -> BTreeMap<String, Coupling> {
    let mut afferent: BTreeMap<&str, usize> = BTreeMap::new();
    let mut efferent: BTreeMap<&str, usize> = BTreeMap::new();
    let mut all_modules: BTreeSet<&str> = BTreeSet::new();

    for (from, targets) in dependencies {
        all_modules.insert(from);
        let out = efferent.entry(from).or_insert(0);
        for to in targets.iter().filter(|t| *t != from) {
            *out += 1;
            all_modules.insert(to);
            *afferent.entry(to).or_insert(0) += 1;
        }
    }

    all_modules
        .into_iter()
        .map(|module| {
            let ca = afferent.get(module).copied().unwrap_or(0);
            let ce = efferent.get(module).copied().unwrap_or(0);
            (module.to_string(), Coupling::new(ca, ce))
        })
        .collect()
}
