use super::{Column, DefaultValue, Table};

pub const EXPERIENCE_KINDS: &[&str] = &["work", "education"];
pub const DEFAULT_TAG_COLOR: &str = "gray";
pub const DEFAULT_ORDER: i32 = 0;

pub const MESSAGES: Table = Table {
    name: "messages",
    columns: &[
        Column::serial("id"),
        Column::text("name", "name"),
        Column::text("email", "email"),
        Column::text("subject", "subject").nullable(),
        Column::text("message", "message"),
        Column::timestamp("created_at", "createdAt").default_now(),
    ],
    primary_key: &["id"],
};

pub const USERS: Table = Table {
    name: "users",
    columns: &[
        Column::serial("id"),
        Column::text("username", "username").unique(),
        Column::text("password", "password"),
    ],
    primary_key: &["id"],
};

pub const PROJECTS: Table = Table {
    name: "projects",
    columns: &[
        Column::serial("id"),
        Column::text("title", "title"),
        Column::text("description", "description"),
        Column::text("image", "image").nullable(),
        Column::text("github", "github"),
        Column::text("live_url", "liveUrl").nullable(),
        Column::boolean("featured", "featured").default_to(DefaultValue::Bool(false)),
        Column::timestamp("created_at", "createdAt").default_now(),
    ],
    primary_key: &["id"],
};

pub const TAGS: Table = Table {
    name: "tags",
    columns: &[
        Column::serial("id"),
        Column::text("name", "name").unique(),
        Column::text("color", "color").default_to(DefaultValue::Text(DEFAULT_TAG_COLOR)),
    ],
    primary_key: &["id"],
};

pub const PROJECT_TAGS: Table = Table {
    name: "project_tags",
    columns: &[
        Column::integer("project_id", "projectId").references("projects", "id"),
        Column::integer("tag_id", "tagId").references("tags", "id"),
    ],
    primary_key: &["project_id", "tag_id"],
};

pub const SKILLS: Table = Table {
    name: "skills",
    columns: &[
        Column::serial("id"),
        Column::text("name", "name").unique(),
        Column::text("icon", "icon"),
        Column::text("category", "category"),
        Column::text("description", "description").nullable(),
        Column::integer("order", "order").default_to(DefaultValue::Integer(DEFAULT_ORDER)),
    ],
    primary_key: &["id"],
};

pub const EXPERIENCES: Table = Table {
    name: "experiences",
    columns: &[
        Column::serial("id"),
        Column::text("title", "title"),
        Column::text("subtitle", "subtitle"),
        Column::text("date", "date").nullable(),
        // Only enforced by validation; the column itself is plain text.
        Column::text("type", "type").one_of(EXPERIENCE_KINDS),
        Column::integer("order", "order").default_to(DefaultValue::Integer(DEFAULT_ORDER)),
    ],
    primary_key: &["id"],
};

pub const EXPERIENCE_DETAILS: Table = Table {
    name: "experience_details",
    columns: &[
        Column::serial("id"),
        Column::integer("experience_id", "experienceId").references("experiences", "id"),
        Column::text("detail", "detail"),
        Column::integer("order", "order").default_to(DefaultValue::Integer(DEFAULT_ORDER)),
    ],
    primary_key: &["id"],
};

/// All tables, referenced tables first.
pub const TABLES: &[Table] = &[
    MESSAGES,
    USERS,
    PROJECTS,
    TAGS,
    PROJECT_TAGS,
    SKILLS,
    EXPERIENCES,
    EXPERIENCE_DETAILS,
];
