//! API documentation: the OpenAPI descriptor and a Swagger UI page for it.

use iron::headers::ContentType;
use iron::{status, Handler, IronResult, Request, Response};

pub const DOCS_PATH: &str = "/api/docs";
pub const DESCRIPTOR_PATH: &str = "/static/masterblog.json";

const DESCRIPTOR: &str = include_str!("../static/masterblog.json");

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Masterblog API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "{descriptor}", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub struct DescriptorHandler;

impl Handler for DescriptorHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        Ok(Response::with((status::Ok, DESCRIPTOR)))
    }
}

pub struct SwaggerUiHandler;

impl Handler for SwaggerUiHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let page = SWAGGER_UI.replace("{descriptor}", DESCRIPTOR_PATH);
        let mut res = Response::with((status::Ok, page));
        res.headers.set(ContentType::html());
        Ok(res)
    }
}
