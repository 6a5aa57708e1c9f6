use sqlx::PgPool;
use storage::{
    dto::{
        account::{
            FAVORITE_FIELDS_LIMIT, UserActivityResponse, UserProfileResponse, favorite_fields,
        },
        comment::{CommentResponse, RECENT_COMMENTS_LIMIT},
        traffic::TrafficReportResponse,
    },
    error::Result,
    repository::{
        activity::ActivityRepository, comment::CommentRepository,
        traffic_report::TrafficReportRepository,
    },
};

use crate::middleware::auth::{AdminPolicy, CurrentUser};

/// Dashboard rows per list
const ACTIVITY_LIMIT: i64 = RECENT_COMMENTS_LIMIT;

pub fn profile(user: &CurrentUser, admins: &AdminPolicy) -> UserProfileResponse {
    UserProfileResponse {
        user_id: user.user_id.clone(),
        email: user.email.clone(),
        display_name: user.display_name(),
        is_admin: admins.is_admin(&user.email),
    }
}

/// Dashboard data: totals, the user's most-used fields and their latest posts
pub async fn recent_activity(pool: &PgPool, user_id: &str) -> Result<UserActivityResponse> {
    let activity = ActivityRepository::new(pool);
    let stats = activity.stats_for_user(user_id).await?;
    let favorites = favorite_fields(
        activity.contributions_for_user(user_id).await?,
        FAVORITE_FIELDS_LIMIT,
    );

    let recent_reports = TrafficReportRepository::new(pool)
        .recent_by_user(user_id, ACTIVITY_LIMIT)
        .await?
        .into_iter()
        .map(TrafficReportResponse::from)
        .collect();

    let recent_comments = CommentRepository::new(pool)
        .recent_by_user(user_id, ACTIVITY_LIMIT)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(UserActivityResponse {
        stats,
        favorite_fields: favorites,
        recent_reports,
        recent_comments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_flags_admins() {
        let admins = AdminPolicy::from_comma_separated("coach@example.com");
        let coach = CurrentUser {
            user_id: "u1".to_string(),
            email: "Coach@Example.com".to_string(),
            name: None,
        };
        let player = CurrentUser {
            user_id: "u2".to_string(),
            email: "player@example.com".to_string(),
            name: Some("Riley".to_string()),
        };

        let profile_coach = profile(&coach, &admins);
        assert!(profile_coach.is_admin);
        assert_eq!(profile_coach.display_name, "Coach");

        let profile_player = profile(&player, &admins);
        assert!(!profile_player.is_admin);
        assert_eq!(profile_player.display_name, "Riley");
    }
}
