//! Schema migrations for the blog database.

use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users_table;
mod m20240601_000002_create_groups_table;
mod m20240601_000003_create_posts_table;
mod m20240601_000004_create_comments_table;
mod m20240601_000005_create_follows_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users_table::Migration),
            Box::new(m20240601_000002_create_groups_table::Migration),
            Box::new(m20240601_000003_create_posts_table::Migration),
            Box::new(m20240601_000004_create_comments_table::Migration),
            Box::new(m20240601_000005_create_follows_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 5);
    }
}
