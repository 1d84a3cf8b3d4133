use crate::config::ServerConfig;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(config: web::Data<ServerConfig>) -> impl Responder {
    HttpResponse::Ok().json(config.published_tool_config())
}

#[cfg(test)]
mod tests {
    use crate::config::ServerConfig;
    use actix_web::{test, web, App};
    use common::model::datasource::{DataSourceConfig, ToolConfig};

    #[actix_web::test]
    async fn test_config_is_published_with_data_urls() {
        let mut config = ServerConfig::default();
        config.tool.files_to_search.push(DataSourceConfig::new(
            "SRD",
            "Condition",
            "conditions.json",
            &["index", "name"],
        ));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .service(crate::services::tool_config::configure_routes()),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/config").to_request();
        let published: ToolConfig = test::call_and_read_body_json(&app, req).await;

        assert_eq!(published.files_to_search.len(), 1);
        assert_eq!(published.files_to_search[0].path, "/data/conditions.json");
        assert_eq!(published.files_to_search[0].properties_to_search, vec!["index", "name"]);
    }
}
