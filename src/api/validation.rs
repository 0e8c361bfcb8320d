use super::ApiError;

pub fn validate_anime_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid anime ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    if query.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(query)
}
