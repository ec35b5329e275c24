//! SQL for the single `blog` table (MySQL dialect).

/// Rows written by the startup seed.
pub const SEED_POST_COUNT: usize = 5;

pub const DROP_BLOG: &str = "DROP TABLE IF EXISTS blog";

/// - `id` INT AUTO_INCREMENT primary key
/// - `title` bounded to 255 characters, nullable as in the deployed schema
pub const CREATE_BLOG: &str = r#"
CREATE TABLE IF NOT EXISTS blog (
    id INT NOT NULL AUTO_INCREMENT,
    title VARCHAR(255),
    PRIMARY KEY (id)
)
"#;

pub const INSERT_POST: &str = "INSERT INTO blog (title) VALUES (?)";

pub const SELECT_TITLES: &str = "SELECT title FROM blog";

pub const SELECT_POSTS: &str = "SELECT id, title FROM blog ORDER BY id";
