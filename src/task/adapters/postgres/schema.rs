//! Diesel schema for task persistence.

diesel::table! {
    /// Task records. Rows are soft-deleted, never removed.
    tasks (id) {
        /// Database-assigned task identifier.
        id -> Int8,
        /// Task title.
        title -> Text,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Progress status in upper snake case.
        #[max_length = 20]
        status -> Varchar,
        /// Priority in upper snake case.
        #[max_length = 10]
        priority -> Varchar,
        /// Due date.
        due_date -> Timestamptz,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Soft-delete timestamp.
        deleted_at -> Nullable<Timestamptz>,
        /// Blocks update and delete when set.
        read_only -> Bool,
    }
}
