// src/common/i18n.rs

// Catálogo de mensagens exibidas ao usuário.
// Espanhol é o idioma padrão; inglês quando o cliente pede "en".

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    // Erros
    InvalidFields,
    EmptyIdNumber,
    CustomDataJson,
    InvalidFieldName,
    VisitorNotFound,
    CustomFieldNotFound,
    UserNotFound,
    IdNumberAlreadyExists,
    EmailAlreadyExists,
    AlreadyExists,
    InvalidCredentials,
    InvalidToken,
    PermissionDenied,
    CannotDeleteSelf,
    RegistrationDenied,
    StoreUnavailable,
    UnsupportedPhotoType,
    InvalidPhotoPath,
    PhotoNotFound,
    Unexpected,

    // Resultado da consulta pública
    HeadlineAuthorized,
    HeadlineDenied,
    HeadlineNotFound,
    NotFoundDetail,
    ExpiredNotice,
    Yes,
    No,
}

pub fn translate(lang: &str, key: MessageKey) -> &'static str {
    match lang {
        "en" => english(key),
        _ => spanish(key),
    }
}

fn spanish(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidFields => "Uno o más campos son inválidos.",
        MessageKey::EmptyIdNumber => "Por favor ingrese un número de cédula",
        MessageKey::CustomDataJson => "Los datos adicionales deben ser un objeto.",
        MessageKey::InvalidFieldName => "El nombre del campo solo admite minúsculas, números y guiones bajos.",
        MessageKey::VisitorNotFound => "Visitante no encontrado",
        MessageKey::CustomFieldNotFound => "Campo no encontrado",
        MessageKey::UserNotFound => "Usuario no encontrado",
        MessageKey::IdNumberAlreadyExists => "Ya existe un visitante con esa cédula.",
        MessageKey::EmailAlreadyExists => "Este email ya está en uso.",
        MessageKey::AlreadyExists => "El registro ya existe.",
        MessageKey::InvalidCredentials => "Email o contraseña inválidos.",
        MessageKey::InvalidToken => "Sesión inválida o expirada.",
        MessageKey::PermissionDenied => "No tienes permisos para acceder a esta sección.",
        MessageKey::CannotDeleteSelf => "No puedes eliminar tu propio usuario.",
        MessageKey::RegistrationDenied => "Error al registrar ingreso",
        MessageKey::StoreUnavailable => "Error al realizar la consulta. Intente nuevamente.",
        MessageKey::UnsupportedPhotoType => "Formato de foto no soportado.",
        MessageKey::InvalidPhotoPath => "Ruta de foto inválida.",
        MessageKey::PhotoNotFound => "Foto no encontrada",
        MessageKey::Unexpected => "Ocurrió un error inesperado.",
        MessageKey::HeadlineAuthorized => "✅ Visitante Autorizado",
        MessageKey::HeadlineDenied => "🚫 Acceso No Autorizado",
        MessageKey::HeadlineNotFound => "🚫 Visitante No Encontrado",
        MessageKey::NotFoundDetail => "No existe registro para la cédula ingresada",
        MessageKey::ExpiredNotice => "Autorización vencida",
        MessageKey::Yes => "Sí",
        MessageKey::No => "No",
    }
}

fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::InvalidFields => "One or more fields are invalid.",
        MessageKey::EmptyIdNumber => "Please enter an ID number",
        MessageKey::CustomDataJson => "Additional data must be an object.",
        MessageKey::InvalidFieldName => "Field names may only contain lowercase letters, digits and underscores.",
        MessageKey::VisitorNotFound => "Visitor not found",
        MessageKey::CustomFieldNotFound => "Field not found",
        MessageKey::UserNotFound => "User not found",
        MessageKey::IdNumberAlreadyExists => "A visitor with this ID number already exists.",
        MessageKey::EmailAlreadyExists => "This email is already in use.",
        MessageKey::AlreadyExists => "The record already exists.",
        MessageKey::InvalidCredentials => "Invalid email or password.",
        MessageKey::InvalidToken => "Invalid or expired session.",
        MessageKey::PermissionDenied => "You do not have permission to access this section.",
        MessageKey::CannotDeleteSelf => "You cannot delete your own user.",
        MessageKey::RegistrationDenied => "Entry registration was denied",
        MessageKey::StoreUnavailable => "The lookup failed. Please try again.",
        MessageKey::UnsupportedPhotoType => "Unsupported photo format.",
        MessageKey::InvalidPhotoPath => "Invalid photo path.",
        MessageKey::PhotoNotFound => "Photo not found",
        MessageKey::Unexpected => "An unexpected error occurred.",
        MessageKey::HeadlineAuthorized => "✅ Visitor Authorized",
        MessageKey::HeadlineDenied => "🚫 Access Not Authorized",
        MessageKey::HeadlineNotFound => "🚫 Visitor Not Found",
        MessageKey::NotFoundDetail => "There is no record for the given ID number",
        MessageKey::ExpiredNotice => "Authorization expired",
        MessageKey::Yes => "Yes",
        MessageKey::No => "No",
    }
}
