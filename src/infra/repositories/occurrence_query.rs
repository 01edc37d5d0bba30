//! Builds the event occurrence search statement shared by both backends.
//!
//! One row per (event, event date). Venue and space come from the date when
//! set and from the event otherwise. Type names are aggregated per owner in
//! locale-filtered CTEs so joins never multiply rows; type filters are
//! `EXISTS` sub-selects so the aggregates still list every linked type.

use chrono::{DateTime, Utc};

use crate::domain::models::event::{EventQuery, SortKey, SortOrder};
use crate::domain::services::date_filter::DateBound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite => "?".to_string(),
        }
    }

    /// CTE `name` with one row per owner and its distinct type names joined
    /// by `, ` in the requested locale. SQLite's `group_concat(DISTINCT ..)`
    /// takes no separator, so it de-duplicates in a sub-select instead.
    fn type_names_cte(&self, name: &str, links: &TypeLinks) -> String {
        let TypeLinks { link_table, owner, type_column, type_table } = links;
        let joined = format!(
            "{link_table} l JOIN {type_table} t ON t.type_id = l.{type_column} \
             JOIN req_locale rl ON rl.id = t.i18n_locale_id"
        );
        match self {
            Dialect::Postgres => format!(
                "{name} AS (SELECT l.{owner}, string_agg(DISTINCT t.name, ', ' ORDER BY t.name) AS names \
                 FROM {joined} GROUP BY l.{owner})"
            ),
            Dialect::Sqlite => format!(
                "{name} AS (SELECT d.{owner}, group_concat(d.name, ', ' ORDER BY d.name) AS names \
                 FROM (SELECT DISTINCT l.{owner}, t.name FROM {joined}) d GROUP BY d.{owner})"
            ),
        }
    }
}

struct TypeLinks {
    link_table: &'static str,
    owner: &'static str,
    type_column: &'static str,
    type_table: &'static str,
}

const EVENT_TYPES: TypeLinks =
    TypeLinks { link_table: "event_link_types", owner: "event_id", type_column: "event_type_id", type_table: "event_type" };
const GENRE_TYPES: TypeLinks =
    TypeLinks { link_table: "genre_link_types", owner: "event_id", type_column: "genre_type_id", type_table: "genre_type" };
const VENUE_TYPES: TypeLinks =
    TypeLinks { link_table: "venue_link_types", owner: "venue_id", type_column: "venue_type_id", type_table: "venue_type" };

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i32),
    BigInt(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

#[derive(Debug)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

struct StatementBuilder {
    dialect: Dialect,
    sql: String,
    params: Vec<SqlParam>,
}

impl StatementBuilder {
    fn new(dialect: Dialect) -> Self {
        Self { dialect, sql: String::with_capacity(2048), params: Vec::new() }
    }

    fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    fn push_param(&mut self, param: SqlParam) -> &mut Self {
        self.params.push(param);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
        self
    }

    fn push_in_list(&mut self, column: &str, values: impl IntoIterator<Item = SqlParam>) -> &mut Self {
        self.push(column).push(" IN (");
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_param(value);
        }
        self.push(")")
    }

    fn push_date_bounds(&mut self, bounds: &[DateBound]) -> &mut Self {
        for bound in bounds {
            self.push(" AND ed.date_start ")
                .push(bound.op.as_sql())
                .push(" ")
                .push_param(SqlParam::Timestamp(bound.at));
        }
        self
    }

    fn finish(self) -> Statement {
        Statement { sql: self.sql, params: self.params }
    }
}

pub fn occurrence_statement(dialect: Dialect, query: &EventQuery) -> Statement {
    let mut b = StatementBuilder::new(dialect);

    b.push("WITH req_locale AS (SELECT id FROM i18n_locale WHERE iso_639_1 = ")
        .push_param(SqlParam::Text(query.lang.clone()))
        .push("),\n");

    for (name, links) in [
        ("event_type_names", &EVENT_TYPES),
        ("genre_type_names", &GENRE_TYPES),
        ("venue_type_names", &VENUE_TYPES),
    ] {
        b.push(&dialect.type_names_cte(name, links)).push(",\n");
    }

    b.push(
        "space_type_names AS (SELECT st.type_id, st.name FROM space_type st \
         JOIN req_locale rl ON rl.id = st.i18n_locale_id)\n",
    );

    b.push(
        "SELECT \
            e.id AS event_id, \
            ed.id AS event_date_id, \
            e.title AS event_title, \
            e.description AS event_description, \
            ed.date_start AS event_date_start, \
            ed.date_end AS event_date_end, \
            e.created_at AS event_created_at, \
            v.id AS venue_id, \
            v.name AS venue_name, \
            v.postal_code AS venue_postal_code, \
            v.city AS venue_city, \
            o.id AS organizer_id, \
            o.name AS organizer_name, \
            s.id AS space_id, \
            s.name AS space_name, \
            stn.name AS space_type, \
            etn.names AS event_types, \
            gtn.names AS genre_types, \
            vtn.names AS venue_types, \
            i.id AS image_id, \
            i.source_name AS image_source_name\n\
         FROM event e\n\
         JOIN event_date ed ON ed.event_id = e.id\n\
         LEFT JOIN venue v ON v.id = COALESCE(ed.venue_id, e.venue_id)\n\
         LEFT JOIN space s ON s.id = COALESCE(ed.space_id, e.space_id)\n\
         LEFT JOIN organizer o ON o.id = e.organizer_id\n\
         LEFT JOIN event_type_names etn ON etn.event_id = e.id\n\
         LEFT JOIN genre_type_names gtn ON gtn.event_id = e.id\n\
         LEFT JOIN venue_type_names vtn ON vtn.venue_id = v.id\n\
         LEFT JOIN space_type_names stn ON stn.type_id = s.space_type_id\n\
         LEFT JOIN event_date_link_images edli ON edli.event_date_id = ed.id AND edli.main_image = TRUE\n\
         LEFT JOIN event_link_images eli ON eli.event_id = e.id AND eli.main_image = TRUE\n\
         LEFT JOIN image i ON i.id = COALESCE(edli.image_id, eli.image_id)\n\
         WHERE 1 = 1",
    );

    let filter = &query.filter;

    if !filter.cities.is_empty() {
        b.push(" AND ")
            .push_in_list("v.city", filter.cities.iter().cloned().map(SqlParam::Text));
    }
    if !filter.postal_codes.is_empty() {
        b.push(" AND ")
            .push_in_list("v.postal_code", filter.postal_codes.iter().cloned().map(SqlParam::Text));
    }

    b.push_date_bounds(&filter.date_start);
    b.push_date_bounds(&filter.date_end);

    if !filter.event_ids.is_empty() {
        b.push(" AND ")
            .push_in_list("e.id", filter.event_ids.iter().copied().map(SqlParam::Int));
    }
    if !filter.venue_ids.is_empty() {
        b.push(" AND ").push_in_list(
            "COALESCE(ed.venue_id, e.venue_id)",
            filter.venue_ids.iter().copied().map(SqlParam::Int),
        );
    }
    if !filter.space_ids.is_empty() {
        b.push(" AND ").push_in_list(
            "COALESCE(ed.space_id, e.space_id)",
            filter.space_ids.iter().copied().map(SqlParam::Int),
        );
    }
    if !filter.event_type_ids.is_empty() {
        b.push(" AND EXISTS (SELECT 1 FROM event_link_types fe WHERE fe.event_id = e.id AND ")
            .push_in_list("fe.event_type_id", filter.event_type_ids.iter().copied().map(SqlParam::Int))
            .push(")");
    }
    if !filter.genre_type_ids.is_empty() {
        b.push(" AND EXISTS (SELECT 1 FROM genre_link_types fg WHERE fg.event_id = e.id AND ")
            .push_in_list("fg.genre_type_id", filter.genre_type_ids.iter().copied().map(SqlParam::Int))
            .push(")");
    }
    if !filter.venue_type_ids.is_empty() {
        b.push(" AND EXISTS (SELECT 1 FROM venue_link_types fv WHERE fv.venue_id = v.id AND ")
            .push_in_list("fv.venue_type_id", filter.venue_type_ids.iter().copied().map(SqlParam::Int))
            .push(")");
    }

    let column = match query.sort.key {
        SortKey::DateStart => "ed.date_start",
        SortKey::CreatedAt => "e.created_at",
    };
    let direction = match query.sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    b.push("\nORDER BY ")
        .push(column)
        .push(" ")
        .push(direction)
        .push(", ed.id ASC");

    if let Some(page) = query.page {
        b.push("\nLIMIT ")
            .push_param(SqlParam::BigInt(page.limit))
            .push(" OFFSET ")
            .push_param(SqlParam::BigInt(page.offset));
    }

    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::{EventSort, Page};
    use crate::domain::services::date_filter::CompareOp;
    use chrono::TimeZone;

    #[test]
    fn default_query_only_binds_the_locale() {
        let stmt = occurrence_statement(Dialect::Postgres, &EventQuery::default());
        assert_eq!(stmt.params, vec![SqlParam::Text("de".into())]);
        assert!(stmt.sql.contains("iso_639_1 = $1"));
        assert!(stmt.sql.contains("string_agg(DISTINCT t.name, ', ' ORDER BY t.name)"));
        assert!(stmt.sql.ends_with("ORDER BY ed.date_start ASC, ed.id ASC"));
    }

    #[test]
    fn lists_expand_to_numbered_placeholders() {
        let mut query = EventQuery::default();
        query.filter.venue_ids = vec![4, 7];
        query.filter.cities = vec!["Flensburg".into()];

        let stmt = occurrence_statement(Dialect::Postgres, &query);
        assert!(stmt.sql.contains("v.city IN ($2)"));
        assert!(stmt.sql.contains("COALESCE(ed.venue_id, e.venue_id) IN ($3, $4)"));
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Text("de".into()),
                SqlParam::Text("Flensburg".into()),
                SqlParam::Int(4),
                SqlParam::Int(7),
            ]
        );
    }

    #[test]
    fn sqlite_uses_anonymous_placeholders_and_group_concat() {
        let mut query = EventQuery::default();
        query.filter.event_type_ids = vec![1];
        query.page = Some(Page { limit: 10, offset: 20 });

        let stmt = occurrence_statement(Dialect::Sqlite, &query);
        assert!(!stmt.sql.contains('$'));
        assert!(stmt.sql.contains("group_concat(d.name, ', ' ORDER BY d.name)"));
        assert!(stmt.sql.contains("(SELECT DISTINCT l.event_id, t.name FROM genre_link_types l"));
        assert!(stmt.sql.contains("fe.event_type_id IN (?)"));
        assert!(stmt.sql.ends_with("LIMIT ? OFFSET ?"));
        assert_eq!(stmt.params.len(), 4);
    }

    #[test]
    fn date_bounds_compare_against_start() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut query = EventQuery::default();
        query.filter.date_end = vec![DateBound { op: CompareOp::Lt, at }];
        query.sort = EventSort { key: SortKey::CreatedAt, order: SortOrder::Desc };

        let stmt = occurrence_statement(Dialect::Postgres, &query);
        assert!(stmt.sql.contains("AND ed.date_start < $2"));
        assert!(stmt.sql.contains("ORDER BY e.created_at DESC, ed.id ASC"));
        assert_eq!(stmt.params[1], SqlParam::Timestamp(at));
    }
}
