use axum::Router;
use domain_users::{
    PgUserRepository, UserService,
    auth_handlers::{self, AuthState},
};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let service = UserService::new(repository);

    auth_handlers::router(AuthState {
        service,
        jwt_auth: state.jwt_auth.clone(),
    })
}
