//! Geometry operator id resolution
//!
//! The host identifies operators by id. The twelve operators of the 2D
//! geometry operator class are looked up once per query and mapped back to
//! [`GeomOperator`] when classifying clauses.

use crate::config::{ConfigError, ConfigResult};
use crate::geometry::{GeomOperator, NUM_REAL_OPERATORS};

/// Host lookup of geometry operator ids by symbol
pub trait OperatorResolver {
    /// Id of the `geometry <symbol> geometry` operator, if installed
    fn geometry_operator(&self, symbol: &str) -> Option<u32>;
}

/// Resolved ids of the real geometry operators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryOperators {
    ids: [u32; NUM_REAL_OPERATORS],
}

impl GeometryOperators {
    /// Resolves all operators; any missing one is a configuration error
    pub fn resolve<R: OperatorResolver + ?Sized>(resolver: &R) -> ConfigResult<Self> {
        let mut ids = [0u32; NUM_REAL_OPERATORS];
        for op in GeomOperator::real() {
            ids[op.index()] = resolver.geometry_operator(op.symbol()).ok_or_else(|| {
                ConfigError::geometry_unavailable(format!(
                    "Can't find geometry operator {}",
                    op.symbol()
                ))
            })?;
        }
        Ok(Self { ids })
    }

    /// Builds the table from known ids in operator order
    pub fn from_ids(ids: [u32; NUM_REAL_OPERATORS]) -> Self {
        Self { ids }
    }

    /// Maps a host operator id to a geometry operator
    pub fn lookup(&self, op_id: u32) -> Option<GeomOperator> {
        self.ids
            .iter()
            .position(|id| *id == op_id)
            .map(|i| GeomOperator::real()[i])
    }

    /// Host id of a real operator; commuted forms have none
    pub fn id(&self, op: GeomOperator) -> Option<u32> {
        self.ids.get(op.index()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapResolver(HashMap<&'static str, u32>);

    impl OperatorResolver for MapResolver {
        fn geometry_operator(&self, symbol: &str) -> Option<u32> {
            self.0.get(symbol).copied()
        }
    }

    fn full_resolver() -> MapResolver {
        let mut map = HashMap::new();
        for (i, op) in GeomOperator::real().iter().enumerate() {
            map.insert(op.symbol(), 1000 + i as u32);
        }
        MapResolver(map)
    }

    #[test]
    fn test_resolve_and_lookup() {
        let ops = GeometryOperators::resolve(&full_resolver()).unwrap();
        assert_eq!(ops.lookup(1000), Some(GeomOperator::Overlaps));
        assert_eq!(ops.lookup(1011), Some(GeomOperator::Below));
        assert_eq!(ops.lookup(96), None);
        assert_eq!(ops.id(GeomOperator::Within), Some(1002));
        assert_eq!(ops.id(GeomOperator::CommLeft), None);
    }

    #[test]
    fn test_missing_operator_is_config_error() {
        let mut resolver = full_resolver();
        resolver.0.remove("|>>");
        let err = GeometryOperators::resolve(&resolver).unwrap_err();
        assert!(err.message().contains("|>>"));
    }
}
