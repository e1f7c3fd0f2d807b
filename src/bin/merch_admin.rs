use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use merch_hub_lib::data::migrations::run_pending_migrations;
use merch_hub_lib::data::models::department::{Department, NewDepartment, OFFICIAL_MERCH_DEPARTMENT};
use merch_hub_lib::data::models::roles::UserRole;
use merch_hub_lib::data::models::user::{NewUser, UpdateUser};
use merch_hub_lib::data::repos::implementors::department_repo::DepartmentRepo;
use merch_hub_lib::data::repos::implementors::user_repo::UserRepo;
use merch_hub_lib::data::repos::traits::repository::Repository;
use merch_hub_lib::security::auth::AuthService;
use merch_hub_lib::services::category_service::CategoryService;
use merch_hub_lib::services::user_service::{validate_email, validate_name, validate_password};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SEED_DEPARTMENTS: [&str; 8] = [
    "School of Information Technology Education",
    "School of Teacher Education",
    "School of Criminology",
    "School of Health Sciences",
    "School of Humanities",
    "School of Engineering",
    "School of International Hospitality Management",
    OFFICIAL_MERCH_DEPARTMENT,
];

const SEED_CATEGORIES: [&str; 4] = ["Clothing", "Accessories", "Supplies", "Tech"];

/// (name, email, password, role) for local development accounts.
const SEED_USERS: [(&str, &str, &str, UserRole); 3] = [
    ("Super Administrator", "superadmin@example.com", "superadmin123", UserRole::SuperAdmin),
    ("Department Admin", "admin@example.com", "admin123", UserRole::Admin),
    ("Student User", "student@example.com", "student123", UserRole::Student),
];

#[derive(Parser, Debug)]
#[command(author, version, about = "Maintenance tasks for the merch hub database.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations.
    Migrate,

    /// Insert departments, categories and demo accounts. Existing rows are left alone.
    Seed {
        /// Skip the demo user accounts.
        #[arg(long)]
        no_users: bool,
    },

    /// Create a superadmin account.
    CreateSuperadmin {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Department name to attach the account to.
        #[arg(long)]
        department: Option<String>,
    },

    /// Promote an existing account to superadmin.
    GrantSuperadmin {
        /// Email of the account to promote.
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Migrate => migrate().await,
        Command::Seed { no_users } => seed(!no_users).await,
        Command::CreateSuperadmin {
            name,
            email,
            password,
            department,
        } => create_superadmin(&name, &email, &password, department.as_deref()).await,
        Command::GrantSuperadmin { email } => grant_superadmin(&email).await,
    }
}

async fn migrate() -> anyhow::Result<()> {
    let applied = run_pending_migrations()
        .await
        .context("failed to apply database migrations")?;

    if applied.is_empty() {
        info!("database schema up to date");
    } else {
        for version in &applied {
            info!(version = %version, "applied migration");
        }
    }
    Ok(())
}

async fn ensure_department(repo: &DepartmentRepo, name: &str) -> anyhow::Result<Department> {
    if let Some(existing) = repo.get_by_name(name).await? {
        return Ok(existing);
    }

    let created = repo
        .create(NewDepartment {
            name,
            description: None,
            logo_path: None,
            gcash_qr_image_path: None,
        })
        .await
        .with_context(|| format!("failed to create department {name}"))?;
    info!(department = name, "department created");
    Ok(created)
}

async fn seed(with_users: bool) -> anyhow::Result<()> {
    let departments = DepartmentRepo::new();
    let mut first_department = None;
    for name in SEED_DEPARTMENTS {
        let department = ensure_department(&departments, name).await?;
        first_department.get_or_insert(department.department_id);
    }

    let categories = CategoryService::new();
    for name in SEED_CATEGORIES {
        categories
            .ensure(name)
            .await
            .with_context(|| format!("failed to create category {name}"))?;
    }
    info!(
        departments = SEED_DEPARTMENTS.len(),
        categories = SEED_CATEGORIES.len(),
        "reference data seeded"
    );

    if !with_users {
        return Ok(());
    }

    let users = UserRepo::new();
    let auth = AuthService::new();
    for (name, email, password, role) in SEED_USERS {
        if users.get_by_email(email).await?.is_some() {
            info!(email, "demo user already present");
            continue;
        }

        let password_hash = auth.hash_password(password).await?;
        users
            .create(NewUser {
                name,
                email,
                password_hash: &password_hash,
                role,
                department_id: first_department,
            })
            .await
            .with_context(|| format!("failed to create demo user {email}"))?;
        info!(email, role = role.as_str(), "demo user created");
    }

    Ok(())
}

async fn create_superadmin(
    name: &str,
    email: &str,
    password: &str,
    department: Option<&str>,
) -> anyhow::Result<()> {
    validate_name(name)?;
    validate_email(email)?;
    validate_password(password)?;

    let users = UserRepo::new();
    if users.get_by_email(email).await?.is_some() {
        bail!("an account with email {email} already exists; use grant-superadmin instead");
    }

    let department_id = match department {
        Some(dept) => {
            let found = DepartmentRepo::new()
                .get_by_name(dept)
                .await?
                .with_context(|| format!("department {dept} not found"))?;
            Some(found.department_id)
        }
        None => None,
    };

    let password_hash = AuthService::new().hash_password(password).await?;
    let user = users
        .create(NewUser {
            name,
            email,
            password_hash: &password_hash,
            role: UserRole::SuperAdmin,
            department_id,
        })
        .await
        .context("failed to create superadmin")?;

    info!(user_id = user.user_id, email, "superadmin created");
    Ok(())
}

async fn grant_superadmin(email: &str) -> anyhow::Result<()> {
    let users = UserRepo::new();
    let user = users
        .get_by_email(email)
        .await?
        .with_context(|| format!("no account with email {email}"))?;

    if user.is_superadmin() {
        info!(email, "account is already a superadmin");
        return Ok(());
    }

    users
        .update(
            user.user_id,
            UpdateUser {
                role: Some(UserRole::SuperAdmin),
                ..Default::default()
            },
        )
        .await?;
    // Existing tokens still carry the old role in their claims.
    users.bump_token_version(user.user_id).await?;

    info!(user_id = user.user_id, email, "granted superadmin");
    Ok(())
}
