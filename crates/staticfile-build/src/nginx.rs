use staticfile_core::SiteConfig;

// Literal template text. Each optional fragment keeps the newline and
// indentation that surround it, so the output is stable byte-for-byte.

const HEAD: &str = r#"
worker_processes 1;
daemon off;

error_log <%= ENV["APP_ROOT"] %>/nginx/logs/error.log;
events { worker_connections 1024; }

http {
  charset utf-8;
  log_format cloudfoundry '$http_x_forwarded_for - $http_referer - [$time_local] "$request" $status $body_bytes_sent';
  access_log <%= ENV["APP_ROOT"] %>/nginx/logs/access.log cloudfoundry;
  default_type application/octet-stream;
  include mime.types;
  sendfile on;

  gzip on;
  gzip_disable "msie6";
  gzip_comp_level 6;
  gzip_min_length 1100;
  gzip_buffers 16 8k;
  gzip_proxied any;
  gunzip on;
  gzip_static always;
  gzip_types text/plain text/css text/js text/xml text/javascript application/javascript application/x-javascript application/json application/xml application/xml+rss;
  gzip_vary on;

  tcp_nopush on;
  keepalive_timeout 30;
  port_in_redirect off; # Ensure that redirects don't include the internal container PORT - <%= ENV["PORT"] %>
  server_tokens off;

  server {
    listen <%= ENV["PORT"] %>;
    server_name localhost;

    location / {
      root <%= ENV["APP_ROOT"] %>/public;

      "#;

const PUSH_STATE: &str = r#"
        if (!-e $request_filename) {
          rewrite ^(.*)$ / break;
        }
      "#;

const INDEX: &str = "\n\n      index index.html index.htm Default.htm;\n\n      ";

const AUTOINDEX: &str = "\n        autoindex on;\n      ";

const BASIC_AUTH: &str = r#"
        auth_basic "Restricted";  #For Basic Auth
        auth_basic_user_file <%= ENV["APP_ROOT"] %>/nginx/conf/.htpasswd;
      "#;

const HTTPS_REDIRECT: &str = r#"
        if ($http_x_forwarded_proto != "https") {
          return 301 https://$host$request_uri;
        }
"#;

const FORCE_HTTPS_ENV_OPEN: &str = r#"
      <% if ENV["FORCE_HTTPS"] %>"#;

const FORCE_HTTPS_ENV_CLOSE: &str = "      <% end %>\n";

const SSI: &str = "\n        ssi on;\n      ";

const BLANK: &str = "\n\n      ";

const LOCATION_END: &str = "\n    }\n\n  ";

const DENY_DOT_FILES: &str = r#"
    location ~ /\. {
      deny all;
      return 404;
    }
  "#;

const TAIL: &str = "\n  }\n}\n";

/// Renders `nginx.conf` from the site configuration.
///
/// The output still carries ERB placeholders (`<%= ENV["PORT"] %>`,
/// `<%= ENV["APP_ROOT"] %>`) that the startup script resolves at launch.
pub struct NginxConfGenerator<'a> {
    config: &'a SiteConfig,
}

impl<'a> NginxConfGenerator<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    pub fn render(&self) -> String {
        let config = self.config;
        let mut out = String::with_capacity(2048);

        out.push_str(HEAD);
        if config.push_state {
            out.push_str(PUSH_STATE);
        }

        out.push_str(INDEX);
        if config.directory_index {
            out.push_str(AUTOINDEX);
        }

        out.push_str(BLANK);
        if config.basic_auth {
            out.push_str(BASIC_AUTH);
        }

        out.push_str(BLANK);
        if config.force_https {
            out.push_str(HTTPS_REDIRECT);
            out.push_str("      ");
        } else {
            // Deferred to the FORCE_HTTPS environment variable at launch.
            out.push_str(FORCE_HTTPS_ENV_OPEN);
            out.push_str(HTTPS_REDIRECT);
            out.push_str(FORCE_HTTPS_ENV_CLOSE);
            out.push_str("      ");
        }

        out.push_str(BLANK);
        if config.ssi {
            out.push_str(SSI);
        }

        out.push_str(BLANK);
        if config.hsts {
            out.push_str(&self.hsts_header());
        }

        out.push_str(BLANK);
        if !config.location_include.is_empty() {
            out.push_str(&format!(
                "\n        include {};\n      ",
                config.location_include
            ));
        }

        if !config.status_codes.is_empty() {
            out.push_str(BLANK);
            for (codes, page) in &config.status_codes {
                out.push_str(&format!("\n        error_page {codes} {page};\n      "));
            }
        }

        out.push_str(LOCATION_END);
        if !config.host_dot_files {
            out.push_str(DENY_DOT_FILES);
        }

        out.push_str(TAIL);
        out
    }

    fn hsts_header(&self) -> String {
        let include_subdomains = if self.config.hsts_include_subdomains {
            "; includeSubDomains"
        } else {
            ""
        };
        let preload = if self.config.hsts_preload {
            "; preload"
        } else {
            ""
        };
        format!(
            "\n        add_header Strict-Transport-Security \"max-age=31536000{include_subdomains}{preload}\";\n      "
        )
    }
}
