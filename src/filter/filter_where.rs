use super::types::{FilterWhereInfo, SqlParam};

/// Predicate that matches every row; conditions are AND-ed onto it.
pub const MATCH_ALL: &str = "1=1";

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    /// Build `1=1 AND "col" op $n ...` and the parameters in placeholder order.
    pub fn generate(conditions: &[FilterWhereInfo]) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self {
            param_values: vec![],
            param_index: 0,
        };
        filter_where.build(conditions)
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> (String, Vec<SqlParam>) {
        let mut sql_conditions = vec![MATCH_ALL.to_string()];
        for condition in conditions {
            let placeholder = self.param(condition.data.clone());
            sql_conditions.push(format!(
                "\"{}\" {} {}",
                condition.column,
                condition.operator.to_sql(),
                placeholder
            ));
        }
        (sql_conditions.join(" AND "), std::mem::take(&mut self.param_values))
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
