// Sample data - a small campus worth of users, posts, groups and one chat
//
// Only runs against an empty users table so restarts never duplicate rows.

use tracing::info;

use crate::{
    core::PostAuthor,
    database::Database,
    domains::{friends, messaging},
    error::AppResult,
    models::{Group, NewGroup, NewPost, NewUser, Post, User},
};

const SAMPLE_USERS: &[(&str, &str, &str, &[&str])] = &[
    ("maya_codes", "Maya Chen", "CS junior, hackathon regular", &["coding", "robotics", "coffee"]),
    ("leo_sketches", "Leo Alvarez", "Illustration major. Always drawing.", &["art", "anime", "music"]),
    ("priya_eats", "Priya Patel", "Finding the best dumplings in NYC", &["food", "travel", "photography"]),
    ("sam_lifts", "Sam Okafor", "Gym at 6am, library at 6pm", &["fitness", "basketball", "coding"]),
    ("nora_reads", "Nora Kim", "Currently reading too many books at once", &["books", "writing", "coffee"]),
];

const SAMPLE_GROUPS: &[(&str, &str, i64)] = &[
    ("CS_Club", "💻", 45),
    ("Art_Lovers", "🎨", 32),
    ("Foodies_NYC", "🍕", 67),
    ("Book_Club", "📚", 28),
    ("Fitness_Gang", "💪", 54),
    ("Music_Makers", "🎵", 41),
];

pub async fn seed_sample_data(db: &Database) -> AppResult<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(db.pool())
        .await?;
    if existing > 0 {
        info!("Skipping sample data, {} users already present", existing);
        return Ok(());
    }

    let mut users = Vec::with_capacity(SAMPLE_USERS.len());
    for (username, display_name, bio, interests) in SAMPLE_USERS {
        let user = User::create(
            db,
            NewUser {
                username: username.to_string(),
                display_name: Some(display_name.to_string()),
                bio: Some(bio.to_string()),
                pfp: Some(format!("https://i.pravatar.cc/150?u={}", username)),
                interests: interests.iter().map(|i| i.to_string()).collect(),
            },
        )
        .await?;
        users.push(user);
    }

    // everyone follows the next two people in the list
    for (i, user) in users.iter().enumerate() {
        for step in 1..=2 {
            let friend = &users[(i + step) % users.len()];
            friends::add_friend(db, user.id, friend.id).await?;
        }
    }

    let captions = [
        ("Late night debugging session 🐛", "Finally fixed the segfault. Pizza was involved."),
        ("New sketchbook day", "Filled the first page with pigeons from Washington Square."),
        ("Best dumplings below 14th St", "Ranking coming soon, taking suggestions."),
    ];
    for (user, (caption, content)) in users.iter().zip(captions) {
        Post::create(
            db,
            NewPost {
                user_id: PostAuthor::User(user.id),
                caption: Some(caption.to_string()),
                content: Some(content.to_string()),
                image_url: None,
            },
        )
        .await?;
    }
    Post::create(
        db,
        NewPost {
            user_id: PostAuthor::Anonymous,
            caption: Some("Anyone else locked out of the lab?".to_string()),
            content: Some("Card reader on the 3rd floor is down again".to_string()),
            image_url: None,
        },
    )
    .await?;

    for (name, image, members) in SAMPLE_GROUPS {
        Group::create(
            db,
            NewGroup {
                name: name.to_string(),
                members: *members,
                image: Some(image.to_string()),
            },
        )
        .await?;
    }

    if let [first, second, ..] = users.as_slice() {
        let conversation = messaging::get_or_create_conversation(db, first.id, second.id).await?;
        messaging::send_message(db, conversation.id, first.id, "Are you coming to CS_Club tonight?").await?;
        messaging::send_message(db, conversation.id, second.id, "Yes! Saving you a seat").await?;
    }

    info!(
        "Seeded {} users, {} groups and sample posts",
        users.len(),
        SAMPLE_GROUPS.len()
    );
    Ok(())
}
