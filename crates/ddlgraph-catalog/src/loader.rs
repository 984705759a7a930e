use std::collections::BTreeMap;

use ddlgraph_core::{
    CandidateKey, Catalog, CheckConstraint, Column, Constraint, ConstraintBody, DataType, Error,
    ExternalRoutine, ForeignKey, Index, IndexType, ObjectId, ObjectKind, Parameter, Result,
    Routine, RoutineBody, SchemaObject, Table, Trigger, View, XmlPattern,
};

use crate::codes::{
    self, IndexColumnRole, compression_from_code, constraint_state, data_type_from_row, flag,
};
use crate::options::ExtractOptions;
use crate::rows::{
    CheckRow, ColumnRow, ForeignKeyRow, IndexColumnRow, IndexRow, KeyRow, RoutineParameterRow,
    RoutineRow, TableRow, TriggerRow, ViewRow,
};

/// Builds a [`Catalog`] from provider rows.
///
/// Parents must be loaded before their children. A child row whose parent
/// was not loaded is dropped: with a schema filter in place that is the
/// normal case, not an error.
pub struct CatalogLoader<'a> {
    opts: &'a ExtractOptions,
    catalog: Catalog,
    routines_by_specific: BTreeMap<(String, String), ObjectId>,
}

impl<'a> CatalogLoader<'a> {
    pub fn new(opts: &'a ExtractOptions) -> Self {
        Self {
            opts,
            catalog: Catalog::new(),
            routines_by_specific: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn load_tables(&mut self, rows: Vec<TableRow>) -> Result<()> {
        for row in rows {
            if !self.opts.includes_schema(&row.schema) {
                continue;
            }
            let mut table = Table::new(trimmed(&row.schema), trimmed(&row.name));
            table.tablespace = non_blank(row.tablespace);
            table.index_tablespace = non_blank(row.index_tablespace);
            table.long_tablespace = non_blank(row.long_tablespace);
            table.compression = compression_from_code(&row.row_compression);
            table.organization = codes::organization_from_code(&row.organization);
            table.volatile = row.volatile.trim().eq_ignore_ascii_case("C");
            table.append_mode = flag(&row.append_mode);
            table.remarks = row.remarks;
            self.catalog.insert(table)?;
        }
        Ok(())
    }

    pub fn load_views(&mut self, rows: Vec<ViewRow>) -> Result<()> {
        if !self.opts.include_views {
            return Ok(());
        }
        for row in rows {
            if !self.opts.includes_schema(&row.schema) {
                continue;
            }
            self.catalog.insert(View {
                schema: trimmed(&row.schema),
                name: trimmed(&row.name),
                kind: codes::view_kind_from_code(&row.view_type),
                query_optimization: flag(&row.optimization),
                text: row.text,
                remarks: row.remarks,
            })?;
        }
        Ok(())
    }

    pub fn load_columns(&mut self, rows: Vec<ColumnRow>) -> Result<()> {
        for row in rows {
            let Some(table) = self.catalog.table_mut(&row.table_schema, &row.table_name) else {
                dropped("column", &row.table_schema, &row.table_name);
                continue;
            };
            let data_type = DataType {
                name: trimmed(&row.type_name),
                length: row.length,
                scale: row.scale,
                for_bit_data: row.codepage == Some(0),
            };
            table.add_column(Column {
                ordinal: row.ordinal,
                name: trimmed(&row.name),
                data_type,
                nullable: !row.nulls.trim().eq_ignore_ascii_case("N"),
                default: non_blank(row.default),
                generated: codes::generated_from_codes(
                    &row.identity,
                    &row.generated,
                    row.generation_text.as_deref(),
                ),
                remarks: row.remarks,
            });
        }
        Ok(())
    }

    pub fn load_indexes(&mut self, rows: Vec<IndexRow>) -> Result<()> {
        for row in rows {
            if !self.opts.includes_schema(&row.schema) {
                continue;
            }
            if self.catalog.table(row.table_schema.trim(), row.table_name.trim()).is_none() {
                dropped("index", &row.table_schema, &row.table_name);
                continue;
            }
            let xml_pattern = row.xml_pattern.map(|pattern| XmlPattern {
                pattern: pattern.pattern,
                data_type: DataType {
                    name: trimmed(&pattern.type_name),
                    length: pattern.length,
                    scale: pattern.scale,
                    for_bit_data: false,
                },
                reject_invalid_values: pattern.type_model.trim().eq_ignore_ascii_case("R"),
            });
            let index_type = codes::index_type_from_code(&row.index_type);
            if index_type == IndexType::XmlPattern && xml_pattern.is_none() {
                return Err(Error::InvalidCatalog(format!(
                    "xml pattern index {}.{} has no pattern",
                    row.schema.trim(),
                    row.name.trim()
                )));
            }
            self.catalog.insert(Index {
                schema: trimmed(&row.schema),
                name: trimmed(&row.name),
                table_schema: trimmed(&row.table_schema),
                table_name: trimmed(&row.table_name),
                unique_rule: codes::unique_rule_from_code(&row.unique_rule),
                index_type,
                columns: Vec::new(),
                include: Vec::new(),
                pctfree: row.pctfree,
                reverse_scans: flag(&row.reverse_scans),
                compression: flag(&row.compression),
                exclude_null_keys: row.null_keys.trim().eq_ignore_ascii_case("N"),
                xml_pattern,
                remarks: row.remarks,
            })?;
        }
        Ok(())
    }

    /// Attach index columns in key sequence.
    pub fn load_index_columns(&mut self, mut rows: Vec<IndexColumnRow>) -> Result<()> {
        rows.sort_by_key(|row| row.sequence);
        for row in rows {
            let Some(index) = self.catalog.index_mut(&row.index_schema, &row.index_name) else {
                dropped("index column", &row.index_schema, &row.index_name);
                continue;
            };
            let name = trimmed(&row.column_name);
            match codes::index_column_role_from_code(&row.order) {
                IndexColumnRole::Key(order) => index.push_key(name, order),
                IndexColumnRole::Include => index.push_include(name),
            }
        }
        Ok(())
    }

    pub fn load_checks(&mut self, rows: Vec<CheckRow>) -> Result<()> {
        for row in rows {
            let body = ConstraintBody::Check(CheckConstraint {
                expression: row.text,
            });
            self.insert_constraint(
                &row.schema,
                &row.table,
                &row.name,
                constraint_state(&row.flags),
                body,
                row.remarks,
            )?;
        }
        Ok(())
    }

    pub fn load_candidate_keys(&mut self, rows: Vec<KeyRow>) -> Result<()> {
        for row in rows {
            let body = ConstraintBody::CandidateKey(CandidateKey {
                kind: codes::key_kind_from_code(&row.key_type)?,
                columns: row.columns.iter().map(|column| trimmed(column)).collect(),
            });
            self.insert_constraint(
                &row.schema,
                &row.table,
                &row.name,
                constraint_state(&row.flags),
                body,
                row.remarks,
            )?;
        }
        Ok(())
    }

    pub fn load_foreign_keys(&mut self, rows: Vec<ForeignKeyRow>) -> Result<()> {
        for row in rows {
            let body = ConstraintBody::ForeignKey(ForeignKey {
                columns: row.columns.iter().map(|column| trimmed(column)).collect(),
                referenced_schema: trimmed(&row.referenced_schema),
                referenced_table: trimmed(&row.referenced_table),
                referenced_key: non_blank(row.referenced_key),
                referenced_columns: row
                    .referenced_columns
                    .iter()
                    .map(|column| trimmed(column))
                    .collect(),
                on_update: codes::fk_update_from_code(&row.update_rule),
                on_delete: codes::fk_delete_from_code(&row.delete_rule),
            });
            self.insert_constraint(
                &row.schema,
                &row.table,
                &row.name,
                constraint_state(&row.flags),
                body,
                row.remarks,
            )?;
        }
        Ok(())
    }

    fn insert_constraint(
        &mut self,
        schema: &str,
        table: &str,
        name: &str,
        state: ddlgraph_core::ConstraintState,
        body: ConstraintBody,
        remarks: Option<String>,
    ) -> Result<()> {
        if self.catalog.table(schema.trim(), table.trim()).is_none() {
            dropped("constraint", schema, table);
            return Ok(());
        }
        self.catalog.insert(Constraint {
            schema: trimmed(schema),
            table: trimmed(table),
            name: trimmed(name),
            state,
            body,
            remarks,
        })?;
        Ok(())
    }

    pub fn load_triggers(&mut self, rows: Vec<TriggerRow>) -> Result<()> {
        if !self.opts.include_triggers {
            return Ok(());
        }
        for row in rows {
            if !self.opts.includes_schema(&row.schema) {
                continue;
            }
            if self.catalog.table(row.table_schema.trim(), row.table_name.trim()).is_none() {
                dropped("trigger", &row.table_schema, &row.table_name);
                continue;
            }
            self.catalog.insert(Trigger {
                schema: trimmed(&row.schema),
                name: trimmed(&row.name),
                table_schema: trimmed(&row.table_schema),
                table_name: trimmed(&row.table_name),
                text: row.text,
                remarks: row.remarks,
            })?;
        }
        Ok(())
    }

    pub fn load_routines(&mut self, rows: Vec<RoutineRow>) -> Result<()> {
        if !self.opts.include_routines {
            return Ok(());
        }
        for row in rows {
            if !self.opts.includes_schema(&row.schema) {
                continue;
            }
            let body = if row.language.trim().eq_ignore_ascii_case("SQL") {
                let text = row.text.filter(|text| !text.trim().is_empty()).ok_or_else(|| {
                    Error::InvalidCatalog(format!(
                        "SQL routine {}.{} has no text",
                        row.schema.trim(),
                        row.specific_name.trim()
                    ))
                })?;
                RoutineBody::Sql { text }
            } else {
                RoutineBody::External(ExternalRoutine {
                    returns: row.returns.as_ref().map(data_type_from_row),
                    language: trimmed(&row.language),
                    parameter_style: row
                        .parameter_style
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or_default()
                        .to_string(),
                    deterministic: flag(&row.deterministic),
                    external_action: !row.external_action.trim().eq_ignore_ascii_case("N"),
                    fenced: flag(&row.fenced),
                    threadsafe: flag(&row.threadsafe),
                    implementation: row.external_name.unwrap_or_default(),
                    sql_data_access: codes::sql_data_access_from_code(&row.sql_data_access),
                    parameters: Vec::new(),
                })
            };
            let routine = Routine {
                schema: trimmed(&row.schema),
                name: trimmed(&row.name),
                specific_name: trimmed(&row.specific_name),
                routine_type: codes::routine_type_from_code(&row.routine_type)?,
                body,
                remarks: row.remarks,
            };
            let key = (routine.schema.clone(), routine.specific_name.clone());
            let id = self.catalog.insert(routine)?;
            self.routines_by_specific.insert(key, id);
        }
        Ok(())
    }

    /// Parameters only matter for external routines; SQL routines carry them
    /// in their text.
    pub fn load_routine_parameters(&mut self, rows: Vec<RoutineParameterRow>) -> Result<()> {
        for row in rows {
            let key = (trimmed(&row.routine_schema), trimmed(&row.specific_name));
            let Some(id) = self.routines_by_specific.get(&key) else {
                dropped("routine parameter", &row.routine_schema, &row.specific_name);
                continue;
            };
            let Some(routine) = self.catalog.routine_mut(id) else {
                continue;
            };
            if let RoutineBody::External(external) = &mut routine.body {
                external.add_parameter(Parameter {
                    ordinal: row.ordinal,
                    name: non_blank(row.name),
                    data_type: data_type_from_row(&row.data_type),
                });
            }
        }
        Ok(())
    }

    /// Check structural invariants and hand out the catalog.
    pub fn finish(self) -> Result<Catalog> {
        for object in self.catalog.objects() {
            if let SchemaObject::Index(index) = object {
                if index.columns.is_empty() {
                    return Err(Error::InvalidCatalog(format!(
                        "{} has no key columns",
                        index.id()
                    )));
                }
            }
        }
        tracing::debug!(
            event = "catalog_loaded",
            objects = self.catalog.len(),
            routines = self
                .catalog
                .ids()
                .filter(|id| id.kind == ObjectKind::Routine)
                .count()
        );
        Ok(self.catalog)
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
}

fn dropped(row: &str, schema: &str, parent: &str) {
    tracing::debug!(
        event = "dangling_row_dropped",
        row,
        parent = %format!("{}.{}", schema.trim(), parent.trim())
    );
}
