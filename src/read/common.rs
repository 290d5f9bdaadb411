#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SingleReadInput {
    pub(crate) table_name: String,
}

/// Arguments for single-item reads (GetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        Self {
            table_name: single_read_args.table_name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MultipleReadInput {
    pub(crate) index_name: Option<String>,
    pub(crate) limit: Option<i32>,
    pub(crate) table_name: String,
}

/// Arguments for multiple-item reads (Query).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct MultipleReadArgs {
    /// The name of a global secondary index to query instead of the base table.
    pub index_name: Option<String>,
    /// Maximum number of items returned in total.
    ///
    /// The query keeps requesting pages until this many items were collected or
    /// the table has no more matches. `None` reads every page.
    pub max_items: Option<usize>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<MultipleReadArgs> for MultipleReadInput {
    fn from(multiple_read_args: MultipleReadArgs) -> Self {
        // one extra item per page tells a full page apart from a truncated result
        let limit = multiple_read_args
            .max_items
            .map(|max_items| i32::try_from(max_items.saturating_add(1)).unwrap_or(i32::MAX));
        Self {
            index_name: multiple_read_args.index_name,
            limit,
            table_name: multiple_read_args.table_name,
        }
    }
}

/// apply common single read operation settings to a builder
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder.table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .table_name($multiple_read_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::unbounded(None, None)]
    #[case::capped(Some(100), Some(101))]
    #[case::saturates(Some(usize::MAX), Some(i32::MAX))]
    fn test_multiple_read_limit(#[case] max_items: Option<usize>, #[case] expected: Option<i32>) {
        let input: MultipleReadInput = MultipleReadArgs {
            index_name: Some("StatusIndex".to_string()),
            max_items,
            table_name: "Users-dev".to_string(),
        }
        .into();
        assert_eq!(input.limit, expected);
        assert_eq!(input.index_name.as_deref(), Some("StatusIndex"));
    }
}
