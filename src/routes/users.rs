use crate::{
    auth::{
        generate_access_token, hash_password, issue_tokens, verify_password, AccessTokenResponse,
        AuthSettings, AuthTokens, LoginRequest, SignupRequest, VerifiedSession,
        ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER,
    },
    error::AppError,
    models::User,
    store::Store,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use validator::Validate;

fn authenticated_response(user: &User, tokens: AuthTokens) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((REFRESH_TOKEN_HEADER, tokens.refresh_token))
        .insert_header((ACCESS_TOKEN_HEADER, tokens.access_token))
        .json(user)
}

/// Sign up
///
/// Creates a new account and opens its first session. The tokens are sent in
/// the `x-refresh-token` and `x-access-token` headers, the user in the body.
#[post("")]
pub async fn signup(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    if store.find_user_by_email(&signup_data.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&signup_data.password, settings.bcrypt_cost)?;
    let user = store
        .insert_user(&User::new(&signup_data.email, password_hash))
        .await?;
    log::info!("Registered user {}", user.id);

    let tokens = issue_tokens(store.get_ref(), &user, &settings).await?;
    Ok(authenticated_response(&user, tokens))
}

/// Login
///
/// Checks the credentials and opens a new session, answering like `signup`.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    settings: web::Data<AuthSettings>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = store
        .find_user_by_email(&login_data.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let tokens = issue_tokens(store.get_ref(), &user, &settings).await?;
    log::info!("User {} logged in", user.id);
    Ok(authenticated_response(&user, tokens))
}

/// Exchanges a live session for a fresh access token.
#[get("/me/access-token")]
pub async fn refresh_access_token(
    session: VerifiedSession,
    settings: web::Data<AuthSettings>,
) -> Result<impl Responder, AppError> {
    let access_token = generate_access_token(session.user.id, &settings)?;
    Ok(HttpResponse::Ok()
        .insert_header((ACCESS_TOKEN_HEADER, access_token.clone()))
        .json(AccessTokenResponse { access_token }))
}

/// Logout: revokes the session named by the refresh-token headers.
#[delete("/me/session")]
pub async fn end_session(
    session: VerifiedSession,
    store: web::Data<dyn Store>,
) -> Result<impl Responder, AppError> {
    store
        .delete_session(session.user.id, &session.refresh_token)
        .await?;
    log::info!("User {} ended a session", session.user.id);
    Ok(HttpResponse::NoContent().finish())
}
