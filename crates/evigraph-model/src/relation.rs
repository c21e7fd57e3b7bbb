use serde::{Deserialize, Serialize};

/// A provenance relation between two evidence nodes.
///
/// All but `Contains` correspond to a JSON-LD key on the source entity.
/// `Contains` links a synthetic dataset collection to the datasets popped
/// out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    GeneratedBy,
    UsedSoftware,
    UsedDataset,
    UsedSample,
    UsedInstrument,
    Contains,
}

impl Relation {
    /// Relations that are stored on entities, in raw-graph traversal order.
    pub const ENTITY_RELATIONS: [Relation; 5] = [
        Relation::GeneratedBy,
        Relation::UsedDataset,
        Relation::UsedSoftware,
        Relation::UsedSample,
        Relation::UsedInstrument,
    ];

    /// JSON-LD key the relation is read from.
    pub fn key(self) -> &'static str {
        match self {
            Relation::GeneratedBy => "generatedBy",
            Relation::UsedSoftware => "usedSoftware",
            Relation::UsedDataset => "usedDataset",
            Relation::UsedSample => "usedSample",
            Relation::UsedInstrument => "usedInstrument",
            Relation::Contains => "contains",
        }
    }

    /// Human-readable edge label.
    pub fn label(self) -> &'static str {
        match self {
            Relation::GeneratedBy => "generated by",
            Relation::UsedSoftware => "used software",
            Relation::UsedDataset => "used dataset",
            Relation::UsedSample => "used sample",
            Relation::UsedInstrument => "used instrument",
            Relation::Contains => "contains",
        }
    }

    /// Type given to a stand-in entity when the relation only carries a bare id.
    pub fn implied_target_type(self) -> &'static str {
        match self {
            Relation::GeneratedBy => "Computation",
            Relation::UsedSoftware => "Software",
            Relation::UsedDataset | Relation::Contains => "Dataset",
            Relation::UsedSample => "Sample",
            Relation::UsedInstrument => "Instrument",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ENTITY_RELATIONS
            .into_iter()
            .find(|relation| relation.key() == key)
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_relations_round_trip_through_keys() {
        for relation in Relation::ENTITY_RELATIONS {
            assert_eq!(Relation::from_key(relation.key()), Some(relation));
        }
        assert_eq!(Relation::from_key("contains"), None);
        assert_eq!(Relation::from_key("name"), None);
    }
}
