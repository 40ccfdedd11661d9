// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Public ---
        handlers::public::health,
        handlers::public::search_visitor,
        handlers::public::register_entry,
        handlers::photos::get_photo,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_entries,
        handlers::dashboard::get_events,

        // --- Visitors ---
        handlers::visitors::list_visitors,
        handlers::visitors::get_visitor,
        handlers::visitors::create_visitor,
        handlers::visitors::update_visitor,
        handlers::visitors::delete_visitor,
        handlers::photos::upload_photo,

        // --- Custom Fields ---
        handlers::custom_fields::list_fields,
        handlers::custom_fields::create_field,
        handlers::custom_fields::update_field,
        handlers::custom_fields::delete_field,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::delete_user,
    ),
    components(
        schemas(
            // --- Visitors ---
            models::visitor::Visitor,
            models::visitor::AccessDecision,
            models::visitor::VisitorPayload,
            models::visitor::DisplayField,
            models::visitor::SearchOutcome,

            // --- Custom Fields ---
            models::custom_field::CustomFieldType,
            models::custom_field::CustomField,
            models::custom_field::CustomFieldPayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,
            models::dashboard::DailyEntryCount,
            models::dashboard::VisitorChange,
            models::dashboard::VisitorEvent,

            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
        )
    ),
    tags(
        (name = "Public", description = "Consulta de Visitantes na Portaria"),
        (name = "Auth", description = "Autenticação e Sessão"),
        (name = "Dashboard", description = "Indicadores do Painel"),
        (name = "Visitors", description = "Gestão de Visitantes"),
        (name = "Custom Fields", description = "Campos Personalizados"),
        (name = "Users", description = "Usuários Administrativos (super_admin)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
