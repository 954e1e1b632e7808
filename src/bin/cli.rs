//! testnav CLI
//!
//! Command-line front end for the instructor directory.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use testnav::{
    error::{AppError, Result},
    flows::{DeepLink, SearchBox, Wizard},
    models::{
        Config, ExamType, Instructor, InstructorDraft, LEARNING_STYLES, Post, ReviewDraft,
        SubjectCatalog,
    },
    pipeline::{self, SortOrder, card_line, newest_first, podium, with_ranks},
    services::{ApiClient, InstructorApi, RequestContext, fetch_recommendations, or_default, or_empty},
    utils::unique_tags,
};

/// testnav - Exam-prep instructor directory
#[derive(Parser, Debug)]
#[command(
    name = "testnav",
    version,
    about = "Find, compare and review exam-prep instructors"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "testnav.toml")]
    config: PathBuf,

    /// Backend origin, overriding `[api].base_url`
    #[arg(long, env = "TESTNAV_API_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for authenticated calls
    #[arg(long, env = "TESTNAV_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Free-text instructor search
    Search {
        keyword: String,

        /// Exam type label or slug (e.g. 수능, naesin)
        #[arg(long)]
        exam: Option<ExamType>,

        #[arg(long)]
        subject: Option<String>,

        /// Learning-style tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// rating | reviews | recent
        #[arg(long)]
        sort: Option<SortOrder>,
    },

    /// Browse one subject page, e.g. `browse suneung math`
    Browse {
        exam_slug: String,
        subject_slug: String,

        #[arg(long, default_value_t = SortOrder::Rating)]
        sort: SortOrder,
    },

    /// Guided recommendation, from facets or a deep link
    Recommend {
        #[arg(long, required_unless_present = "link")]
        exam: Option<ExamType>,

        #[arg(long, required_unless_present = "link")]
        subject: Option<String>,

        /// Learning-style tag (repeatable, at least one)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Deep-link query string, e.g. `examType=수능&subject=수학&tags=a,b`
        #[arg(long, conflicts_with_all = ["exam", "subject", "tags"])]
        link: Option<String>,
    },

    /// Leaderboard podium and the latest community posts
    Top {
        /// Number of instructors (default: `[finder].leaderboard_size`)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Instructor profile with its reviews
    Detail { id: String },

    /// Submit a review
    Review {
        id: String,

        /// Star rating, 1-5
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        comment: String,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Show the subject catalog per exam type
    Subjects,

    /// Community board: list posts, or show one thread
    Posts {
        /// Post id to open
        id: Option<String>,

        /// Only the latest posts
        #[arg(long)]
        latest: bool,
    },

    /// Manage instructor records (needs an admin token)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Validate configuration
    Validate,
}

#[derive(Subcommand, Debug)]
enum AdminAction {
    /// List instructors with their status
    List,

    /// Register an instructor
    Create(InstructorArgs),

    /// Edit an instructor; omitted fields keep their stored values
    Update {
        id: String,

        #[command(flatten)]
        fields: InstructorArgs,
    },

    /// Flip an instructor between active and inactive
    Toggle { id: String },

    Delete { id: String },
}

#[derive(Args, Debug)]
struct InstructorArgs {
    #[arg(long)]
    name: Option<String>,

    /// Catalog subject id
    #[arg(long, conflicts_with_all = ["exam", "subject"])]
    subject_id: Option<u32>,

    /// Exam type, resolved together with `--subject` through the catalog
    #[arg(long, requires = "subject")]
    exam: Option<ExamType>,

    #[arg(long, requires = "exam")]
    subject: Option<String>,

    #[arg(long)]
    profile_image: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// YouTube link or video id
    #[arg(long)]
    youtube: Option<String>,

    /// true | false
    #[arg(long)]
    active: Option<bool>,
}

impl InstructorArgs {
    /// Overlay the given fields on `draft`.
    fn apply(self, mut draft: InstructorDraft, catalog: &SubjectCatalog) -> Result<InstructorDraft> {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(id) = self.subject_id {
            draft.subject_id = Some(id);
        }
        if let (Some(exam), Some(subject)) = (self.exam, self.subject) {
            let id = catalog.subject_id(exam.label(), &subject).ok_or_else(|| {
                AppError::validation(format!("'{subject}' is not in the {exam} catalog"))
            })?;
            draft.subject_id = Some(id);
        }
        if let Some(image) = self.profile_image {
            draft.profile_image = image;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(link) = self.youtube {
            draft.youtube_link = link;
        }
        if let Some(active) = self.active {
            draft.is_active = active;
        }
        Ok(draft)
    }

    fn needs_catalog(&self) -> bool {
        self.exam.is_some()
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_ranked(instructors: &[Instructor]) {
    if instructors.is_empty() {
        println!("검색 결과가 없습니다.");
        return;
    }
    for ranked in with_ranks(instructors, 1) {
        println!("{}", card_line(ranked.item, Some(ranked.rank)));
    }
}

fn print_posts(posts: &[Post]) {
    for post in posts {
        println!(
            "[{}] {} - {} (댓글 {}) {}",
            post.id,
            post.title,
            post.author(),
            post.comments_count,
            post.created_at
        );
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = loaded.as_ref().map_or("info", |c| c.logging.level.as_str());
    init_logging(cli.verbose, level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let ctx = cli
        .token
        .map(RequestContext::with_token)
        .unwrap_or_default();
    let api = ApiClient::new(&config)?;
    log::debug!("Using API root {}", api.root());

    match cli.command {
        Command::Search {
            keyword,
            exam,
            subject,
            tags,
            sort,
        } => {
            let mut search_box = SearchBox::new();
            let Some(ticket) = search_box.input(&keyword) else {
                log::warn!("Empty keyword, nothing to search");
                return Ok(());
            };

            let mut query = ticket.query.tags(tags);
            if let Some(exam) = exam {
                query = query.exam(exam);
            }
            if let Some(subject) = subject {
                query = query.subject(subject);
            }
            if let Some(sort) = sort {
                query = query.sort(sort);
            }

            let results = or_empty("search", api.search(&ctx, &query).await);
            search_box.apply(ticket.ticket, results);

            let mut results = search_box.results().to_vec();
            pipeline::order(&mut results, sort.unwrap_or(SortOrder::Recent));
            print_ranked(&results);
        }

        Command::Browse {
            exam_slug,
            subject_slug,
            sort,
        } => {
            let exam = ExamType::from_slug(&exam_slug)
                .ok_or_else(|| AppError::validation(format!("unknown exam '{exam_slug}'")))?;
            let subject = exam.subject_for_slug(&subject_slug).ok_or_else(|| {
                AppError::validation(format!("unknown subject '{subject_slug}' for {exam}"))
            })?;

            let catalog = or_default("subject catalog", api.subjects(&ctx).await);
            let query = pipeline::SearchQuery::new()
                .exam(exam)
                .subject(subject)
                .sort(sort)
                .resolve_subject_id(&catalog);

            log::info!("{} {} 강사 ({})", exam, subject, sort);
            let mut results = or_empty("browse", api.browse(&ctx, &query).await);
            pipeline::order(&mut results, sort);
            print_ranked(&results);
        }

        Command::Recommend {
            exam,
            subject,
            tags,
            link,
        } => {
            let mut wizard = Wizard::new(config.finder.strict_deep_links);
            let ticket = match link {
                Some(link) => wizard
                    .hydrate(&DeepLink::from_query(&link))?
                    .ok_or_else(|| AppError::validation("deep link needs examType and subject"))?,
                None => {
                    let exam = exam.ok_or_else(|| AppError::validation("--exam is required"))?;
                    let subject =
                        subject.ok_or_else(|| AppError::validation("--subject is required"))?;
                    let unique = unique_tags(&tags);
                    if unique.is_empty() {
                        return Err(AppError::validation(format!(
                            "choose at least one --tag: {}",
                            LEARNING_STYLES.join(", ")
                        )));
                    }

                    wizard.select_exam(exam)?;
                    wizard.select_subject(&subject)?;
                    for tag in unique {
                        wizard.toggle_tag(tag)?;
                    }
                    wizard.confirm_styles()?
                }
            };

            let catalog = or_default("subject catalog", api.subjects(&ctx).await);
            let query = ticket.query.resolve_subject_id(&catalog);
            let results = fetch_recommendations(&api, &ctx, &query).await;
            wizard.apply(ticket.ticket, results);

            print_ranked(wizard.results());
            println!();
            println!("공유 링크: ?{}", wizard.share_link().to_query());
        }

        Command::Top { limit } => {
            let limit = limit.unwrap_or(config.finder.leaderboard_size);
            let (top, posts) = futures::join!(api.top(&ctx, limit), api.latest_posts(&ctx));
            let top = or_empty("leaderboard", top);

            for (ranked, position) in podium(&top) {
                println!(
                    "{:<7} {:<7} {}",
                    format!("{position:?}"),
                    format!("{:?}", ranked.tier()),
                    card_line(ranked.item, Some(ranked.rank))
                );
            }
            for ranked in with_ranks(&top, 1).into_iter().skip(3) {
                println!("{:<15} {}", "", card_line(ranked.item, Some(ranked.rank)));
            }

            let posts = or_empty("latest posts", posts);
            if !posts.is_empty() {
                println!();
                println!("최근 커뮤니티 글");
                print_posts(&posts);
            }
        }

        Command::Detail { id } => {
            let detail = or_default("instructor detail", api.detail(&ctx, &id).await);
            let Some(instructor) = detail.instructor else {
                log::warn!("Instructor {} not found", id);
                return Ok(());
            };

            println!("{}", card_line(&instructor, None));
            println!("상태: {}", instructor.status_label());
            println!(
                "이미지: {}",
                instructor.profile_image_or(&config.normalize.placeholder_image)
            );
            if let Some(video) = &instructor.video_id {
                println!("영상: https://www.youtube.com/watch?v={video}");
            }
            if !instructor.tags.is_empty() {
                println!("태그: {}", instructor.tags.join(", "));
            }
            if !instructor.description.is_empty() {
                println!();
                println!("{}", instructor.description);
            }

            let mut reviews = detail.reviews;
            newest_first(&mut reviews, |r| r.created_at);
            println!();
            println!("리뷰 {}개", reviews.len());
            for review in &reviews {
                let when = review
                    .created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {} ({}) {}",
                    "★".repeat(review.rating as usize),
                    review.user_name,
                    when,
                    review.comment
                );
            }
        }

        Command::Review {
            id,
            rating,
            comment,
            tags,
        } => {
            let draft = ReviewDraft::new(rating, comment, tags);
            api.submit_review(&ctx, &id, &draft).await?;
            log::info!("리뷰가 등록되었습니다.");
        }

        Command::Subjects => {
            let catalog = or_default("subject catalog", api.subjects(&ctx).await);
            for exam in ExamType::ALL {
                let names: Vec<_> = catalog
                    .for_exam(exam.label())
                    .map(|e| format!("{}#{}", e.name, e.id))
                    .collect();
                let names = if names.is_empty() {
                    exam.finder_subjects().join(", ")
                } else {
                    names.join(", ")
                };
                println!("{} ({}): {}", exam, exam.slug(), names);
            }
            println!();
            println!("학습 스타일: {}", LEARNING_STYLES.join(", "));
        }

        Command::Posts { id: Some(id), .. } => {
            let thread = or_default("post detail", api.post_thread(&ctx, &id).await);
            let Some(post) = thread.post else {
                log::warn!("Post {} not found", id);
                return Ok(());
            };
            println!("{} - {} {}", post.title, post.author(), post.created_at);
            println!();
            println!("{}", post.content);
            println!();
            for comment in &thread.comments {
                let author = if comment.user_name.is_empty() {
                    "익명"
                } else {
                    comment.user_name.as_str()
                };
                println!("  {}: {}", author, comment.content);
            }
        }

        Command::Posts { id: None, latest } => {
            let posts = if latest {
                or_empty("latest posts", api.latest_posts(&ctx).await)
            } else {
                or_empty("posts", api.list_posts(&ctx).await)
            };
            print_posts(&posts);
        }

        Command::Admin { action } => match action {
            AdminAction::List => {
                let instructors = api.list(&ctx, &pipeline::SearchQuery::default()).await?;
                for instructor in &instructors {
                    println!(
                        "{:<8} {}",
                        instructor.status_label(),
                        card_line(instructor, None)
                    );
                }
            }

            AdminAction::Create(fields) => {
                let catalog = if fields.needs_catalog() {
                    api.subjects(&ctx).await?
                } else {
                    SubjectCatalog::default()
                };
                let draft = fields.apply(InstructorDraft::default(), &catalog)?;
                api.create_instructor(&ctx, &draft).await?;
                log::info!("강사가 등록되었습니다.");
            }

            AdminAction::Update { id, fields } => {
                let detail = api.detail(&ctx, &id).await?;
                let stored = detail
                    .instructor
                    .ok_or_else(|| AppError::validation(format!("instructor {id} not found")))?;
                let catalog = if fields.needs_catalog() {
                    api.subjects(&ctx).await?
                } else {
                    SubjectCatalog::default()
                };
                let draft = fields.apply(InstructorDraft::from_instructor(&stored), &catalog)?;
                api.update_instructor(&ctx, &id, &draft).await?;
                log::info!("강사 정보가 수정되었습니다.");
            }

            AdminAction::Toggle { id } => {
                let detail = api.detail(&ctx, &id).await?;
                let stored = detail
                    .instructor
                    .ok_or_else(|| AppError::validation(format!("instructor {id} not found")))?;
                let active = stored.toggled_status();
                api.set_instructor_active(&ctx, &id, active).await?;
                log::info!("{} -> {}", stored.name, if active { "active" } else { "inactive" });
            }

            AdminAction::Delete { id } => {
                api.delete_instructor(&ctx, &id).await?;
                log::info!("Deleted instructor {}", id);
            }
        },

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (API root {})", api.root());
        }
    }

    Ok(())
}
