//! Scan planning
//!
//! Planning runs in three steps the host drives in order:
//! 1. `rel_size`: resolve referenced columns, estimate rows and width
//! 2. `paths`: one unparameterized path from the base restrictions plus
//!    parameterized paths for join clauses and equivalence groups
//! 3. `create_plan`: freeze the chosen path into a [`ScanPlan`]
//!
//! Cost model per path:
//! - file cost: `file_read_cost + predicate_cost * rows_per_file` (the
//!   predicate term only when the path carries geometry checks)
//! - pixel cost: `byte_cost * tuple_width`
//! - rows: `rows_per_file * catalog_rows * selectivity`
//! - startup: `startup_cost + catalog_startup + file_cost + pixel_cost`
//! - total: `startup_cost + catalog_total + catalog_rows * file_cost + rows * pixel_cost`

use super::errors::{PlanError, PlanResult};
use super::host::{HostPlanner, RelationInput};
use super::plan::{RelSize, ScanPath, ScanPlan};
use crate::analyze::{group_used_columns, CatalogJoinGroup, GeometryOperators, Qual, QualAnalyzer, TableInfo};
use crate::catalog::CatalogQuery;
use crate::config::{TableOptions, TableSource};
use crate::expr::{Clause, ColumnType, Expr, Relid};
use crate::observability::{Event, Logger};

/// Parameterized path combinations per candidate clause
const MAX_RELID_SETS_PER_CLAUSE: usize = 10;

/// Plans scans of one swath table
pub struct ScanPlanner<'h, H: HostPlanner + ?Sized> {
    host: &'h H,
    table: TableInfo,
    operators: GeometryOperators,
    catalog_columns: Vec<String>,
    tuple_width: usize,
    size: Option<RelSize>,
}

impl<'h, H: HostPlanner + ?Sized> ScanPlanner<'h, H> {
    pub fn new(
        host: &'h H,
        relid: Relid,
        options: TableOptions,
        operators: GeometryOperators,
    ) -> PlanResult<Self> {
        let table = TableInfo::new(relid, options)?;
        Ok(Self {
            host,
            table,
            operators,
            catalog_columns: Vec::new(),
            tuple_width: 0,
            size: None,
        })
    }

    pub fn table(&self) -> &TableInfo {
        &self.table
    }

    fn is_catalog_mode(&self) -> bool {
        matches!(self.table.source(), Ok(TableSource::Catalog(_)))
    }

    /// Resolves every referenced column and estimates the relation size
    ///
    /// Rows are `file count * rows_per_file`; the width sums the widths of
    /// the referenced columns.
    pub fn rel_size(&mut self, rel: &RelationInput) -> PlanResult<RelSize> {
        if rel.column_widths.len() > self.table.num_columns() {
            return Err(PlanError::invalid_input(format!(
                "Host reports {} columns, table has {}",
                rel.column_widths.len(),
                self.table.num_columns()
            )));
        }

        if self.is_catalog_mode() {
            let opts = self.table.options();
            let base = [
                opts.file_id_column.clone(),
                opts.filename_column.clone(),
                opts.starttime_column.clone(),
            ];
            for name in base {
                self.add_catalog_column(name);
            }
        }

        let relid = self.table.relid();
        let mut attnos: Vec<usize> = rel
            .expressions()
            .flat_map(|e| crate::analyze::used_columns(e, relid))
            .collect();
        for group in &rel.groups {
            attnos.extend(group_used_columns(group, relid));
        }
        for attno in attnos {
            self.use_column(attno, &rel.column_widths)?;
        }

        let files = self.host.file_count(self.table.source()?)?;
        let size = RelSize {
            rows: files as f64 * self.table.options().rows_per_file,
            width: self.tuple_width,
        };
        let rows = size.rows.to_string();
        let width = size.width.to_string();
        Logger::event(
            Event::RelSizeEstimated,
            &[("rows", rows.as_str()), ("width", width.as_str())],
        );
        self.size = Some(size);
        Ok(size)
    }

    fn add_catalog_column(&mut self, name: String) {
        if !self.catalog_columns.contains(&name) {
            self.catalog_columns.push(name);
        }
    }

    /// Resolves a column the first time it is seen
    fn use_column(&mut self, attno: usize, widths: &[Option<usize>]) -> PlanResult<()> {
        if self.table.column_type(attno) != ColumnType::Null {
            return Ok(());
        }
        let kind = self.table.resolve_column(attno)?;
        if kind == ColumnType::Catalog {
            if let Some(name) = self.table.catalog_column(attno).map(str::to_string) {
                self.add_catalog_column(name);
            }
        }
        self.tuple_width += kind.width(widths.get(attno).copied().flatten());
        Ok(())
    }

    /// Query with the output columns and file order every path shares
    fn base_query(&self) -> Option<CatalogQuery<'_>> {
        if !self.is_catalog_mode() {
            return None;
        }
        let mut query = CatalogQuery::new(&self.table);
        for column in &self.catalog_columns {
            query.add_column(column);
        }
        query.add_sort(&self.table.options().file_id_column, false);
        Some(query)
    }

    /// Builds every candidate path
    pub fn paths(&self, rel: &RelationInput) -> PlanResult<Vec<ScanPath>> {
        if self.size.is_none() {
            return Err(PlanError::invalid_input(
                "Relation size must be estimated before building paths",
            ));
        }
        let analyzer = QualAnalyzer::new(&self.table, &self.operators);
        let static_quals = analyzer.analyze_quals(&rel.base_clauses);
        let join_quals = analyzer.analyze_quals(&rel.join_clauses);
        let groups = analyzer.analyze_groups(&rel.groups);
        let mut search = PathSearch {
            planner: self,
            analyzer,
            base: self.base_query(),
            static_quals,
            join_quals,
            groups,
            considered: Vec::new(),
            implied: Vec::new(),
            next_clause_id: rel.max_clause_id().map_or(0, |id| id + 1),
            paths: Vec::new(),
        };
        search.run()?;
        Ok(search.paths)
    }

    /// Freezes `path` into the plan handed to execution
    ///
    /// `scan_clauses` are the clauses the host attached to the scan; those
    /// the path owns are dropped from the recheck list.
    pub fn create_plan(&self, path: &ScanPath, scan_clauses: &[Clause]) -> ScanPlan {
        let mut recheck = Vec::new();
        for clause in scan_clauses {
            if path.owns(clause.id) {
                let id = clause.id.to_string();
                Logger::event(Event::ClauseAbsorbed, &[("clause", id.as_str())]);
            } else {
                recheck.push(clause.clone());
            }
        }

        let plan = ScanPlan {
            relid: self.table.relid(),
            options: self.table.options().clone(),
            query: path.query.clone(),
            predicates: path.predicates.clone(),
            column_types: self.table.column_types().to_vec(),
            params: path.params.clone(),
            recheck,
        };
        let predicates = plan.predicates.len().to_string();
        let rechecked = plan.recheck.len().to_string();
        Logger::event(
            Event::PlanCreated,
            &[
                ("predicates", predicates.as_str()),
                ("recheck", rechecked.as_str()),
            ],
        );
        plan
    }
}

/// State of one `paths` call
struct PathSearch<'p, 'h, H: HostPlanner + ?Sized> {
    planner: &'p ScanPlanner<'h, H>,
    analyzer: QualAnalyzer<'p>,
    base: Option<CatalogQuery<'p>>,
    static_quals: Vec<Qual>,
    join_quals: Vec<Qual>,
    groups: Vec<CatalogJoinGroup>,
    /// Relid sets already turned into paths
    considered: Vec<Vec<Relid>>,
    /// Equalities synthesized so far; reused so ids stay stable
    implied: Vec<Clause>,
    next_clause_id: usize,
    paths: Vec<ScanPath>,
}

impl<'p, 'h, H: HostPlanner + ?Sized> PathSearch<'p, 'h, H> {
    fn run(&mut self) -> PlanResult<()> {
        let static_quals = self.static_quals.clone();
        self.add_path(&static_quals, Vec::new(), Vec::new())?;

        let limit = MAX_RELID_SETS_PER_CLAUSE * (self.join_quals.len() + self.groups.len());

        let join_relids: Vec<Vec<Relid>> = self
            .join_quals
            .iter()
            .map(|q| q.clause.relids.clone())
            .collect();
        for relids in join_relids {
            if self.considered.contains(&relids) {
                continue;
            }
            for old in self.considered.clone() {
                if is_subset(&relids, &old) || is_subset(&old, &relids) {
                    continue;
                }
                if self.considered.len() >= limit {
                    break;
                }
                self.join_path(union(&old, &relids))?;
            }
            self.join_path(relids)?;
        }

        let own = self.planner.table.relid();
        let group_relids: Vec<(Relid, Vec<Relid>)> = self
            .groups
            .iter()
            .flat_map(|g| g.outer_vars().map(move |v| (g.var.relid, v.relid)))
            .filter(|(_, outer)| *outer != own)
            .map(|(local, outer)| (outer, union(&[local], &[outer])))
            .collect();
        for (outer, relids) in group_relids {
            if self.considered.contains(&relids) {
                continue;
            }
            for old in self.considered.clone() {
                if old.contains(&outer) {
                    continue;
                }
                if self.considered.len() >= limit {
                    break;
                }
                self.join_path(union(&old, &[outer]))?;
            }
            self.join_path(relids)?;
        }
        Ok(())
    }

    /// Adds a path parameterized by the relations in `relids` other than
    /// the scanned one
    fn join_path(&mut self, relids: Vec<Relid>) -> PlanResult<()> {
        let own = self.planner.table.relid();
        let req_outer: Vec<Relid> = relids.iter().copied().filter(|r| *r != own).collect();
        if req_outer.is_empty() {
            let set = format!("{:?}", relids);
            Logger::event(Event::JoinRelidsIgnored, &[("relids", set.as_str())]);
            return Ok(());
        }
        if self.considered.contains(&relids) {
            return Ok(());
        }

        let mut quals = self.static_quals.clone();
        quals.extend(
            self.join_quals
                .iter()
                .filter(|q| is_subset(&q.clause.relids, &relids))
                .cloned(),
        );

        let mut implied = Vec::new();
        for i in 0..self.groups.len() {
            let clause = match self.implied_equality(i, &req_outer) {
                Some(c) => c,
                None => continue,
            };
            if let Some(qual) = self.analyzer.classify(&clause) {
                quals.push(qual);
            }
            implied.push(clause);
        }

        self.add_path(&quals, req_outer, implied)?;
        self.considered.push(relids);
        Ok(())
    }

    /// `catalog_column = outer_column` for the first outer member of group
    /// `index` supplied by `req_outer`
    fn implied_equality(&mut self, index: usize, req_outer: &[Relid]) -> Option<Clause> {
        let group = &self.groups[index];
        let outer = group.outer_vars().find(|v| req_outer.contains(&v.relid))?;
        let expr = Expr::op(
            group.group.eq_op,
            &group.group.eq_symbol,
            Expr::Var(group.var.clone()),
            Expr::Var(outer.clone()),
        );
        if let Some(existing) = self.implied.iter().find(|c| c.expr == expr) {
            return Some(existing.clone());
        }
        let clause = Clause::new(self.next_clause_id, expr);
        self.next_clause_id += 1;
        self.implied.push(clause.clone());
        Some(clause)
    }

    fn add_path(&mut self, quals: &[Qual], req_outer: Vec<Relid>, implied: Vec<Clause>) -> PlanResult<()> {
        let planner = self.planner;
        let opts = planner.table.options();

        let mut query = self.base.clone();
        let mut used: Vec<&Qual> = Vec::new();
        let mut own_clauses = Vec::new();
        for qual in quals {
            let accepted = match (&mut query, qual.geometry()) {
                (Some(q), _) => match q.add_qual(qual) {
                    Ok(()) => true,
                    Err(e) => {
                        let id = qual.clause.id.to_string();
                        let reason = e.to_string();
                        Logger::event(
                            Event::QualDeparseFailed,
                            &[("clause", id.as_str()), ("reason", reason.as_str())],
                        );
                        false
                    }
                },
                // without a catalog only the row-level geometry check applies
                (None, Some(_)) => true,
                (None, None) => false,
            };
            if !accepted {
                continue;
            }
            if !qual.recheck() && !own_clauses.contains(&qual.clause.id) {
                own_clauses.push(qual.clause.id);
            }
            used.push(qual);
        }

        let mut params: Vec<Expr> = query.as_ref().map_or_else(Vec::new, |q| q.params().to_vec());
        let mut predicates = Vec::new();
        let mut pred_clauses = Vec::new();
        for qual in used {
            if let Some(p) = qual.predicate_descriptor(&mut params) {
                predicates.push(p);
                pred_clauses.push(qual.clause.clone());
            }
        }

        let (packed, cat_startup, cat_total, cat_rows) = match &query {
            Some(q) => {
                let estimate = q.costs(planner.host)?;
                (
                    Some(q.pack()?),
                    estimate.startup_cost,
                    estimate.total_cost,
                    estimate.rows,
                )
            }
            None => (None, 0.0, 0.0, 1.0),
        };

        let selectivity = if pred_clauses.is_empty() {
            1.0
        } else {
            planner.host.selectivity(&pred_clauses, planner.table.relid())
        };

        let predicate_cost = if predicates.is_empty() { 0.0 } else { opts.predicate_cost };
        let file_cost = opts.file_read_cost + predicate_cost * opts.rows_per_file;
        let pixel_cost = opts.byte_cost * planner.tuple_width as f64;
        let rows = opts.rows_per_file * cat_rows * selectivity;
        let startup_cost = opts.startup_cost + cat_startup + file_cost + pixel_cost;
        let total_cost = opts.startup_cost + cat_total + cat_rows * file_cost + rows * pixel_cost;

        let outer = format!("{:?}", req_outer);
        let total = total_cost.to_string();
        Logger::event(
            Event::PathAdded,
            &[("req_outer", outer.as_str()), ("total_cost", total.as_str())],
        );

        self.paths.push(ScanPath {
            req_outer,
            rows,
            startup_cost,
            total_cost,
            own_clauses,
            query: packed,
            params,
            predicates,
            implied_clauses: implied,
        });
        Ok(())
    }
}

/// True if every element of `a` is in `b`
fn is_subset(a: &[Relid], b: &[Relid]) -> bool {
    a.iter().all(|r| b.contains(r))
}

/// Sorted union of two relid sets
fn union(a: &[Relid], b: &[Relid]) -> Vec<Relid> {
    let mut out: Vec<Relid> = a.iter().chain(b).copied().collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEstimate, CatalogEstimator, CatalogResult};
    use crate::config::ColumnOptions;
    use crate::expr::{Datum, EquivalenceGroup};
    use crate::geometry::{GeoBox, GeomOperator};
    use std::cell::RefCell;

    const REL: Relid = 1;
    const OUTER: Relid = 2;

    struct MockHost {
        files: u64,
        selectivity: f64,
        queries: RefCell<Vec<String>>,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                files: 4,
                selectivity: 0.5,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl CatalogEstimator for MockHost {
        fn estimate(&self, query: &str, _param_types: &[&str]) -> CatalogResult<CatalogEstimate> {
            self.queries.borrow_mut().push(query.to_string());
            Ok(CatalogEstimate {
                startup_cost: 1.0,
                total_cost: 5.0,
                rows: 4.0,
                width: 24,
            })
        }
    }

    impl HostPlanner for MockHost {
        fn selectivity(&self, _clauses: &[Clause], _relid: Relid) -> f64 {
            self.selectivity
        }

        fn file_count(&self, source: TableSource<'_>) -> CatalogResult<u64> {
            match source {
                TableSource::Catalog(_) => Ok(self.files),
                TableSource::File(_) => Ok(1),
            }
        }
    }

    fn columns() -> Vec<ColumnOptions> {
        vec![
            ColumnOptions::named("orbit").with_type("catalog"),
            ColumnOptions::named("fp").with_type("footprint"),
            ColumnOptions::named("sst"),
        ]
    }

    fn catalog_options() -> TableOptions {
        let mut opts = TableOptions::with_catalog("files", columns());
        opts.rows_per_file = 100.0;
        opts
    }

    fn operators() -> GeometryOperators {
        let mut ids = [0u32; 12];
        for (i, id) in ids.iter_mut().enumerate() {
            *id = 500 + i as u32;
        }
        GeometryOperators::from_ids(ids)
    }

    fn fp() -> Expr {
        Expr::var(REL, 1, "geometry")
    }

    fn orbit() -> Expr {
        Expr::var(REL, 0, "int4")
    }

    fn overlaps_box(id: usize) -> Clause {
        let bbox = Expr::constant(Datum::Box(GeoBox::from_corners(0.0, 0.0, 10.0, 10.0)), "geometry");
        Clause::new(
            id,
            Expr::op(500 + GeomOperator::Overlaps.index() as u32, "&&", fp(), bbox),
        )
    }

    fn relation(base: Vec<Clause>, join: Vec<Clause>) -> RelationInput {
        RelationInput {
            targets: vec![fp(), Expr::var(REL, 2, "float8")],
            base_clauses: base,
            join_clauses: join,
            groups: Vec::new(),
            column_widths: vec![Some(4), None, None],
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // =========================================================================
    // Relation size
    // =========================================================================

    #[test]
    fn test_rel_size_counts_referenced_columns() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let size = planner.rel_size(&relation(Vec::new(), Vec::new())).unwrap();
        assert!(approx(size.rows, 400.0));
        assert_eq!(size.width, 120 + 8);
        assert_eq!(planner.table().column_type(0), ColumnType::Null);
        assert_eq!(planner.table().column_type(1), ColumnType::Footprint);
    }

    #[test]
    fn test_rel_size_rejects_extra_columns() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let mut rel = relation(Vec::new(), Vec::new());
        rel.column_widths.push(None);
        assert!(planner.rel_size(&rel).is_err());
    }

    #[test]
    fn test_paths_require_rel_size() {
        let host = MockHost::new();
        let planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let err = planner.paths(&relation(Vec::new(), Vec::new())).unwrap_err();
        assert_eq!(err.code(), crate::planner::PlanErrorCode::HvaultPlanInvalidInput);
    }

    // =========================================================================
    // Paths
    // =========================================================================

    #[test]
    fn test_base_path_costs() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let rel = relation(vec![overlaps_box(0)], Vec::new());
        planner.rel_size(&rel).unwrap();
        let paths = planner.paths(&rel).unwrap();
        assert_eq!(paths.len(), 1);

        let path = &paths[0];
        assert!(!path.is_parameterized());
        assert_eq!(
            path.query.as_ref().unwrap().text,
            "SELECT file_id, filename, starttime FROM files WHERE \
             (footprint && 'BOX(0 0,10 10)'::geometry) ORDER BY file_id"
        );
        assert_eq!(path.own_clauses, vec![0]);
        assert_eq!(path.predicates.len(), 1);
        assert_eq!(path.params.len(), 1);
        assert_eq!(path.query.as_ref().unwrap().param_count, 0);

        // file 10 + 0.001 * 100, pixel 0.001 * 128
        assert!(approx(path.rows, 200.0));
        assert!(approx(path.startup_cost, 10.0 + 1.0 + 10.1 + 0.128));
        assert!(approx(path.total_cost, 10.0 + 5.0 + 4.0 * 10.1 + 200.0 * 0.128));
    }

    #[test]
    fn test_no_predicates_no_predicate_cost() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let rel = relation(Vec::new(), Vec::new());
        planner.rel_size(&rel).unwrap();
        let path = &planner.paths(&rel).unwrap()[0];
        assert!(approx(path.rows, 400.0));
        assert!(approx(path.startup_cost, 10.0 + 1.0 + 10.0 + 0.128));
    }

    #[test]
    fn test_join_clause_adds_parameterized_path() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let join = Clause::new(1, Expr::op(96, "=", orbit(), Expr::var(OUTER, 0, "int4")));
        let rel = relation(Vec::new(), vec![join]);
        planner.rel_size(&rel).unwrap();
        let paths = planner.paths(&rel).unwrap();
        assert_eq!(paths.len(), 2);

        let joined = &paths[1];
        assert_eq!(joined.req_outer, vec![OUTER]);
        assert_eq!(joined.own_clauses, vec![1]);
        assert_eq!(joined.params, vec![Expr::var(OUTER, 0, "int4")]);
        let query = joined.query.as_ref().unwrap();
        assert_eq!(query.param_count, 1);
        assert_eq!(
            query.text,
            "SELECT file_id, filename, starttime, orbit FROM files WHERE (orbit = $1) ORDER BY file_id"
        );
    }

    #[test]
    fn test_non_catalog_join_is_ignored() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let join = Clause::new(
            1,
            Expr::op(670, "=", Expr::var(REL, 2, "float8"), Expr::var(OUTER, 0, "float8")),
        );
        let rel = relation(Vec::new(), vec![join]);
        planner.rel_size(&rel).unwrap();
        assert_eq!(planner.paths(&rel).unwrap().len(), 1);
    }

    #[test]
    fn test_equivalence_group_synthesizes_equality() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let mut rel = relation(vec![overlaps_box(3)], Vec::new());
        rel.groups
            .push(EquivalenceGroup::new(vec![orbit(), Expr::var(OUTER, 0, "int4")], 96));
        planner.rel_size(&rel).unwrap();
        let paths = planner.paths(&rel).unwrap();
        assert_eq!(paths.len(), 2);

        let joined = &paths[1];
        assert_eq!(joined.req_outer, vec![OUTER]);
        assert_eq!(joined.implied_clauses.len(), 1);
        let implied = &joined.implied_clauses[0];
        assert_eq!(implied.id, 4);
        assert!(joined.owns(3));
        assert!(joined.owns(4));
        // catalog parameter first, then the geometry operand
        assert_eq!(joined.params[0], Expr::var(OUTER, 0, "int4"));
        assert_eq!(joined.query.as_ref().unwrap().param_count, 1);
        assert_eq!(joined.predicates[0].param_index, 1);
    }

    #[test]
    fn test_single_file_owns_only_geometry() {
        let host = MockHost::new();
        let mut opts = TableOptions::with_file("/data/granule.hdf", columns());
        opts.rows_per_file = 100.0;
        let mut planner = ScanPlanner::new(&host, REL, opts, operators()).unwrap();
        let orbit_eq = Clause::new(
            1,
            Expr::op(96, "=", orbit(), Expr::constant(Datum::Int(7), "int4")),
        );
        let rel = relation(vec![overlaps_box(0), orbit_eq], Vec::new());
        planner.rel_size(&rel).unwrap();
        let paths = planner.paths(&rel).unwrap();
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert!(path.query.is_none());
        assert_eq!(path.own_clauses, vec![0]);
        assert!(approx(path.rows, 50.0));
        assert!(host.queries.borrow().is_empty());
    }

    // =========================================================================
    // Plan
    // =========================================================================

    #[test]
    fn test_create_plan_keeps_unowned_clauses() {
        let host = MockHost::new();
        let mut planner = ScanPlanner::new(&host, REL, catalog_options(), operators()).unwrap();
        let sst_positive = Clause::new(
            1,
            Expr::op(
                674,
                ">",
                Expr::var(REL, 2, "float8"),
                Expr::constant(Datum::Float(0.0), "float8"),
            ),
        );
        let rel = relation(vec![overlaps_box(0), sst_positive.clone()], Vec::new());
        planner.rel_size(&rel).unwrap();
        let paths = planner.paths(&rel).unwrap();
        let plan = planner.create_plan(&paths[0], &rel.base_clauses);
        assert_eq!(plan.recheck, vec![sst_positive]);
        assert_eq!(plan.predicates.len(), 1);
        assert_eq!(plan.catalog_param_count(), 0);
        assert_eq!(plan.column_types[1], ColumnType::Footprint);
    }

    #[test]
    fn test_relid_sets() {
        assert!(is_subset(&[1], &[1, 2]));
        assert!(!is_subset(&[1, 3], &[1, 2]));
        assert_eq!(union(&[3, 1], &[2, 1]), vec![1, 2, 3]);
    }
}
