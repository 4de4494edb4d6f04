//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique constraints.
    users (id) {
        id -> Uuid,
        username -> Text,
        email -> Text,
        password_hash -> Text,
        bio -> Text,
        avatar -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Saved workspace layouts. `objects` holds the ordered object array.
    layouts (id) {
        id -> Uuid,
        name -> Text,
        objects -> Jsonb,
        owner_id -> Nullable<Uuid>,
        is_public -> Bool,
        forked_from -> Nullable<Uuid>,
        fork_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Layout comments; replies cascade with their parent.
    comments (id) {
        id -> Uuid,
        layout_id -> Uuid,
        author_id -> Uuid,
        username -> Text,
        content -> Text,
        parent_id -> Nullable<Uuid>,
        likes -> Int4,
        liked_by -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    templates (id) {
        id -> Uuid,
        name -> Text,
        description -> Text,
        category -> Text,
        objects -> Jsonb,
        thumbnail_url -> Nullable<Text>,
        is_public -> Bool,
        owner_id -> Nullable<Uuid>,
        usage_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    custom_objects (id) {
        id -> Uuid,
        name -> Text,
        object_type -> Text,
        geometry -> Jsonb,
        material -> Jsonb,
        scale -> Array<Float8>,
        owner_id -> Uuid,
        is_public -> Bool,
        usage_count -> Int4,
        model_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Built-in object catalogue. `(object_type, name)` is unique.
    object_templates (id) {
        id -> Uuid,
        object_type -> Text,
        name -> Text,
        category -> Text,
        scale -> Array<Float8>,
        color -> Text,
        dimensions -> Nullable<Jsonb>,
        material -> Nullable<Jsonb>,
        price -> Float8,
        thumbnail_url -> Nullable<Text>,
        model_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    layouts,
    comments,
    templates,
    custom_objects,
    object_templates,
);
