//! Administrative sections. The route guard has already admitted the
//! request and attached the resolved superadmin.

use axum::extract::OriginalUri;
use axum::{Extension, Json};
use roomdesk_security::UserRecord;

use crate::models::AdminView;

pub async fn room_management(
    OriginalUri(uri): OriginalUri,
    Extension(user): Extension<UserRecord>,
) -> Json<AdminView> {
    Json(AdminView {
        section: "room-management",
        path: uri.path().to_owned(),
        user,
    })
}

pub async fn user_management(
    OriginalUri(uri): OriginalUri,
    Extension(user): Extension<UserRecord>,
) -> Json<AdminView> {
    Json(AdminView {
        section: "user-management",
        path: uri.path().to_owned(),
        user,
    })
}
