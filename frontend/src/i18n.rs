//! Spanish texts for the annotation tool and the editor chrome.

use common::toolbar::dictionary;

/// Translates a dictionary key; unknown keys are shown as they are.
pub fn t(key: &str) -> String {
    let translated = match key {
        dictionary::TITLE => "Anotación",
        dictionary::SEARCH_PLACEHOLDER => "Buscar una anotación",
        dictionary::NO_SOURCES_AVAILABLE => "No hay fuentes disponibles...",
        dictionary::SEARCH_REQUEST_ERROR => "No se pudo procesar la búsqueda debido a",
        dictionary::INVALID_SERVER_DATA => "El servidor respondió con datos no válidos",
        dictionary::INVALID_ANNOTATION_NAME => "Nombre de anotación incorrecto",
        dictionary::NESTED_ANNOTATION => "Las anotaciones no se pueden anidar",
        dictionary::DETACHED_ANNOTATION => "La anotación ya no forma parte del documento",
        dictionary::NOT_AN_ANNOTATION => "El elemento seleccionado no es una anotación",
        other => other,
    };
    translated.to_string()
}
