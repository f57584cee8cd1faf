//! Developer CLI for poking a LearnHub deployment: course detail, the
//! purchased courses listing, and coupon application. Checkout needs the
//! embedded gateway UI and is not drivable from a terminal.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use learnhub_client::{
    auth::InMemoryCredentialStore,
    config::{self, AppConfig},
    events::{self, UiEvent},
    gateway::HeadlessGateway,
    models::Course,
    Portal,
};

#[derive(Parser)]
#[command(name = "learnhub-cli", about = "LearnHub platform client")]
struct Cli {
    /// Print raw JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Credential to act as (stored under the configured auth cookie name)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a course's detail page data
    Course { course_id: String },
    /// List the signed-in user's purchased courses
    MyCourses {
        /// Filter by course title (case-insensitive substring)
        #[arg(long, default_value = "")]
        search: String,
        /// Page of the filtered listing to show
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Apply a coupon code against a course's price
    ApplyCoupon { course_id: String, code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = config::load_config().context("failed to load configuration")?;
    config::init_tracing(app_config.log_level(), app_config.log_json);

    let portal = build_portal(&cli, &app_config)?;

    match cli.command {
        Commands::Course { ref course_id } => show_course(&portal, course_id, cli.json).await?,
        Commands::MyCourses { ref search, page } => {
            list_my_courses(&portal, search, page, cli.json).await?
        }
        Commands::ApplyCoupon {
            ref course_id,
            ref code,
        } => apply_coupon(&portal, course_id, code).await?,
    }

    Ok(())
}

fn build_portal(cli: &Cli, app_config: &AppConfig) -> Result<Portal> {
    let credentials = InMemoryCredentialStore::new();
    if let Some(user) = &cli.user {
        credentials.insert(app_config.auth_cookie_name.clone(), user.clone());
    }

    // Events go nowhere in a one-shot CLI invocation; keep the receiver so
    // sends stay cheap no-ops instead of warnings.
    let (events, receiver) = events::ui_channel(events::DEFAULT_EVENT_CAPACITY);
    drain_in_background(receiver);

    Portal::new(
        app_config.clone(),
        Arc::new(credentials),
        Arc::new(HeadlessGateway),
        events,
    )
    .context("failed to build the portal client")
}

fn drain_in_background(mut receiver: tokio::sync::mpsc::Receiver<UiEvent>) {
    tokio::spawn(async move { while receiver.recv().await.is_some() {} });
}

async fn show_course(portal: &Portal, course_id: &str, json: bool) -> Result<()> {
    let course = portal
        .courses()
        .course_detail(course_id)
        .await
        .context("failed to fetch course detail")?;

    if json {
        return print_json(&course);
    }

    println!("{} [{}]", course.title, course.language);
    println!("created {}  price {}", course.created_on(), course.price);
    println!();
    println!("{}", course.plain_description());
    print_modules(&course);
    Ok(())
}

fn print_modules(course: &Course) {
    for module in &course.modules {
        println!();
        println!("  {}", module.module_title);
        if module.videos.is_empty() {
            println!("    (no videos)");
            continue;
        }
        for video in &module.videos {
            let title = video.video_title.as_deref().unwrap_or("(untitled)");
            let marker = if video.locked { "locked" } else { "open" };
            println!("    - {} [{}]", title, marker);
        }
    }
}

async fn list_my_courses(portal: &Portal, search: &str, page: usize, json: bool) -> Result<()> {
    let mut view = portal
        .my_courses()
        .context("no credential available; pass --user")?;
    view.load().await;

    if view.state() == learnhub_client::views::LoadState::Failed {
        anyhow::bail!("failed to load purchased courses");
    }

    if view.is_empty() {
        println!("No courses found...");
        return Ok(());
    }

    view.set_search_text(search);
    view.set_page(page);

    if json {
        let visible: Vec<_> = view.visible().into_iter().cloned().collect();
        return print_json(&visible);
    }

    for record in view.visible() {
        // Load-time filtering guarantees the course is present.
        if let Some(course) = &record.course {
            println!("{}  (added {})", course.title, course.created_on());
        }
    }
    println!(
        "page {} of {} ({} matching)",
        view.current_page(),
        view.page_count(),
        view.filtered().len()
    );
    Ok(())
}

async fn apply_coupon(portal: &Portal, course_id: &str, code: &str) -> Result<()> {
    let course = portal
        .courses()
        .course_detail(course_id)
        .await
        .context("failed to fetch course detail")?;

    match portal.coupons().apply(code, course.price).await {
        Ok(discount) => {
            println!(
                "{}: {} -> {} with coupon {}",
                course.title, course.price, discount.discount, code
            );
        }
        Err(err) => println!("coupon not applied: {}", err.user_message()),
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
