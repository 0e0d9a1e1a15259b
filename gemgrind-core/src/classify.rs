//! Candidate selection: pure filters over an [`InventorySnapshot`].
//!
//! Every filter returns a [`CandidateSet`]; [`classify`] unions the sets of
//! all configured filters. Descriptions are resolved through the run's
//! [`DescriptionCache`], and an asset without a description is never
//! considered protected.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use crate::inventory::{DescriptionCache, InventorySnapshot, ItemDescription};

/// An asset selected for conversion.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate {
    pub assetid: String,
    pub classid: String,
}

impl Candidate {
    pub fn new(assetid: impl Into<String>, classid: impl Into<String>) -> Self {
        Self {
            assetid: assetid.into(),
            classid: classid.into(),
        }
    }
}

/// Ordered only so that runs and logs are reproducible.
pub type CandidateSet = BTreeSet<Candidate>;

/// Trading cards.
pub const ITEM_CLASS_CARD: &str = "item_class_2";
/// Chat emoticons.
pub const ITEM_CLASS_EMOTICON: &str = "item_class_4";

/// Item classes that the `*_except_protected` filters never select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedClasses(HashSet<String>);

impl ProtectedClasses {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(classes.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, item_class: &str) -> bool {
        self.0.contains(item_class)
    }

    /// True when the description resolves to a protected item class.
    pub fn protects(&self, desc: &ItemDescription) -> bool {
        desc.item_class().is_some_and(|class| self.contains(class))
    }
}

impl Default for ProtectedClasses {
    fn default() -> Self {
        Self::new([ITEM_CLASS_CARD, ITEM_CLASS_EMOTICON])
    }
}

/// Selection strategies, combinable by union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Every asset after the first one of its class.
    Duplicates,
    /// Duplicates whose class is not protected.
    DuplicatesExceptProtected,
    /// Every asset whose class is not protected.
    EverythingExceptProtected,
}

impl Filter {
    pub fn defaults() -> Vec<Filter> {
        vec![
            Filter::EverythingExceptProtected,
            Filter::DuplicatesExceptProtected,
        ]
    }

    pub fn apply(
        self,
        cache: &mut DescriptionCache<'_>,
        protected: &ProtectedClasses,
    ) -> CandidateSet {
        let snapshot = cache.snapshot();
        match self {
            Filter::Duplicates => find_duplicates(snapshot),
            Filter::DuplicatesExceptProtected => {
                find_duplicates_except_protected(cache, protected)
            }
            Filter::EverythingExceptProtected => {
                find_everything_except_protected(cache, protected)
            }
        }
    }
}

/// First asset per classid is kept, in server order; the rest are candidates.
pub fn find_duplicates(snapshot: &InventorySnapshot) -> CandidateSet {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut duplicates = CandidateSet::new();
    for asset in &snapshot.assets {
        if !seen.insert(asset.classid.as_str()) {
            duplicates.insert(Candidate::new(&asset.assetid, &asset.classid));
        }
    }
    duplicates
}

pub fn find_duplicates_except_protected(
    cache: &mut DescriptionCache<'_>,
    protected: &ProtectedClasses,
) -> CandidateSet {
    find_duplicates(cache.snapshot())
        .into_iter()
        .filter(|candidate| !is_protected(cache, protected, &candidate.classid))
        .collect()
}

/// Assets whose description resolves to a protected class.
pub fn find_protected(
    cache: &mut DescriptionCache<'_>,
    protected: &ProtectedClasses,
) -> CandidateSet {
    partition(cache, protected).0
}

/// Complement of [`find_protected`] over the whole asset list.
pub fn find_everything_except_protected(
    cache: &mut DescriptionCache<'_>,
    protected: &ProtectedClasses,
) -> CandidateSet {
    partition(cache, protected).1
}

fn partition(
    cache: &mut DescriptionCache<'_>,
    protected: &ProtectedClasses,
) -> (CandidateSet, CandidateSet) {
    let mut kept = CandidateSet::new();
    let mut rest = CandidateSet::new();
    for asset in &cache.snapshot().assets {
        let candidate = Candidate::new(&asset.assetid, &asset.classid);
        if is_protected(cache, protected, &asset.classid) {
            kept.insert(candidate);
        } else {
            rest.insert(candidate);
        }
    }
    (kept, rest)
}

fn is_protected(
    cache: &mut DescriptionCache<'_>,
    protected: &ProtectedClasses,
    classid: &str,
) -> bool {
    match cache.get(classid) {
        Some(desc) => protected.protects(desc),
        None => false,
    }
}

/// Union of the candidate sets of every filter.
pub fn classify(
    cache: &mut DescriptionCache<'_>,
    filters: &[Filter],
    protected: &ProtectedClasses,
) -> CandidateSet {
    let mut candidates = CandidateSet::new();
    for filter in filters {
        let selected = filter.apply(cache, protected);
        debug!(?filter, selected = selected.len(), "Applied filter");
        candidates.extend(selected);
    }
    info!(
        candidates = candidates.len(),
        assets = cache.snapshot().assets.len(),
        "Classified inventory"
    );
    candidates
}
