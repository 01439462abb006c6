use staticfile_build::NginxConfGenerator;
use staticfile_build::configure::{RenderedConfig, configure_nginx, nginx_conf};
use staticfile_build::mime::MIME_TYPES;
use staticfile_core::{Report, SiteConfig};
use tempfile::TempDir;

const PUSH_STATE_CONF: &str = "
        if (!-e $request_filename) {
          rewrite ^(.*)$ / break;
        }
";

const FORCE_HTTPS_CONF: &str = r#"
        if ($http_x_forwarded_proto != "https") {
          return 301 https://$host$request_uri;
        }
"#;

const FORCE_HTTPS_ERB: &str = r#"
      <% if ENV["FORCE_HTTPS"] %>
        if ($http_x_forwarded_proto != "https") {
          return 301 https://$host$request_uri;
        }
      <% end %>
"#;

const BASIC_AUTH_CONF: &str = r#"
        auth_basic "Restricted";  #For Basic Auth
        auth_basic_user_file <%= ENV["APP_ROOT"] %>/nginx/conf/.htpasswd;
"#;

const HOST_DOT_CONF: &str = r"
    location ~ /\. {
      deny all;
      return 404;
    }
";

fn render(config: &SiteConfig) -> String {
    NginxConfGenerator::new(config).render()
}

// ── nginx.conf Rendering Tests ──

#[test]
fn default_config_renders_base_template() {
    let output = render(&SiteConfig::default());

    assert!(output.starts_with("\nworker_processes 1;\ndaemon off;\n"));
    assert!(output.contains("listen <%= ENV[\"PORT\"] %>;"));
    assert!(output.contains("root <%= ENV[\"APP_ROOT\"] %>/public;"));
    assert!(output.contains("index index.html index.htm Default.htm;"));
    assert!(output.ends_with("\n  }\n}\n"));
    assert!(!output.contains("autoindex on;"));
    assert!(!output.contains("ssi on;"));
    assert!(!output.contains("Strict-Transport-Security"));
    assert!(!output.contains("include ;"));
    assert!(!output.contains("error_page"));
}

#[test]
fn default_config_matches_template_byte_for_byte() {
    let expected = include_str!("fixtures/default_nginx.conf");
    assert_eq!(render(&SiteConfig::default()), expected);
}

#[test]
fn push_state_adds_rewrite() {
    let config = SiteConfig {
        push_state: true,
        ..Default::default()
    };
    assert!(render(&config).contains(PUSH_STATE_CONF));
    assert!(!render(&SiteConfig::default()).contains(PUSH_STATE_CONF));
}

#[test]
fn directory_index_adds_autoindex() {
    let config = SiteConfig {
        directory_index: true,
        ..Default::default()
    };
    assert!(render(&config).contains("autoindex on;"));
}

#[test]
fn basic_auth_adds_htpasswd_reference() {
    let config = SiteConfig {
        basic_auth: true,
        ..Default::default()
    };
    assert!(render(&config).contains(BASIC_AUTH_CONF));
    assert!(!render(&SiteConfig::default()).contains(BASIC_AUTH_CONF));
}

#[test]
fn force_https_redirects_unconditionally() {
    let config = SiteConfig {
        force_https: true,
        ..Default::default()
    };
    let output = render(&config);

    assert!(output.contains(FORCE_HTTPS_CONF));
    assert!(!output.contains(r#"<% if ENV["FORCE_HTTPS"] %>"#));
    assert!(!output.contains("<% end %>"));
}

#[test]
fn force_https_off_defers_redirect_to_env() {
    let output = render(&SiteConfig::default());
    assert!(output.contains(FORCE_HTTPS_ERB));
}

#[test]
fn ssi_adds_directive() {
    let config = SiteConfig {
        ssi: true,
        ..Default::default()
    };
    assert!(render(&config).contains("\n        ssi on;\n"));
}

#[test]
fn hsts_adds_header() {
    let config = SiteConfig {
        hsts: true,
        ..Default::default()
    };
    assert!(render(&config).contains(r#"add_header Strict-Transport-Security "max-age=31536000";"#));
}

#[test]
fn hsts_extras_extend_header() {
    let config = SiteConfig {
        hsts: true,
        hsts_include_subdomains: true,
        hsts_preload: true,
        ..Default::default()
    };
    assert!(render(&config).contains(
        r#"add_header Strict-Transport-Security "max-age=31536000; includeSubDomains; preload";"#
    ));
}

#[test]
fn hsts_extras_alone_render_nothing() {
    let config = SiteConfig {
        hsts_preload: true,
        ..Default::default()
    };
    assert!(!render(&config).contains("Strict-Transport-Security"));
}

#[test]
fn location_include_adds_include() {
    let config = SiteConfig {
        location_include: "a/b/c".to_owned(),
        ..Default::default()
    };
    assert!(render(&config).contains("\n        include a/b/c;\n"));
}

#[test]
fn status_codes_add_error_pages() {
    let mut config = SiteConfig::default();
    config
        .status_codes
        .insert("404".to_owned(), "/404.html".to_owned());
    config
        .status_codes
        .insert("500 502".to_owned(), "/50x.html".to_owned());
    let output = render(&config);

    assert!(output.contains("error_page 404 /404.html;"));
    assert!(output.contains("error_page 500 502 /50x.html;"));
    assert!(output.find("error_page 404").unwrap() < output.find("error_page 500").unwrap());
}

#[test]
fn dotfiles_denied_unless_hosted() {
    assert!(render(&SiteConfig::default()).contains(HOST_DOT_CONF));

    let config = SiteConfig {
        host_dot_files: true,
        ..Default::default()
    };
    assert!(!render(&config).contains(HOST_DOT_CONF));
}

#[test]
fn fragments_keep_fixed_order() {
    let config = SiteConfig {
        push_state: true,
        directory_index: true,
        basic_auth: true,
        force_https: true,
        ssi: true,
        hsts: true,
        location_include: "extra.conf".to_owned(),
        ..Default::default()
    };
    let output = render(&config);
    let positions: Vec<usize> = [
        "rewrite ^(.*)$ / break;",
        "autoindex on;",
        "auth_basic \"Restricted\";",
        "return 301",
        "ssi on;",
        "Strict-Transport-Security",
        "include extra.conf;",
        "location ~ /\\.",
    ]
    .iter()
    .map(|needle| output.find(needle).unwrap())
    .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

// ── configure_nginx Tests ──

#[test]
fn configure_writes_generated_files() {
    let tmp = TempDir::new().unwrap();
    let config = SiteConfig {
        ssi: true,
        ..Default::default()
    };
    let mut report = Report::new();

    configure_nginx(tmp.path(), &config, &mut report).unwrap();

    let conf = std::fs::read_to_string(tmp.path().join("nginx/conf/nginx.conf")).unwrap();
    assert_eq!(conf, render(&config));
    let mime = std::fs::read_to_string(tmp.path().join("nginx/conf/mime.types")).unwrap();
    assert_eq!(mime, MIME_TYPES);
    assert!(tmp.path().join("nginx/logs").is_dir());
    assert!(!tmp.path().join("nginx/conf/.htpasswd").exists());
    assert_eq!(report.steps(), vec!["Configuring nginx"]);
}

#[test]
fn configure_copies_override_nginx_conf() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("public")).unwrap();
    std::fs::write(tmp.path().join("public/nginx.conf"), "nginx configuration").unwrap();
    let mut report = Report::new();

    configure_nginx(tmp.path(), &SiteConfig::default(), &mut report).unwrap();

    let data = std::fs::read(tmp.path().join("nginx/conf/nginx.conf")).unwrap();
    assert_eq!(data, b"nginx configuration");
    assert!(tmp.path().join("public/nginx.conf").exists());
    assert!(report.warnings()[0].contains("overriding nginx.conf is deprecated"));
}

#[test]
fn configure_copies_override_mime_types() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("public")).unwrap();
    std::fs::write(tmp.path().join("public/mime.types"), "mime types info").unwrap();

    configure_nginx(tmp.path(), &SiteConfig::default(), &mut Report::new()).unwrap();

    let data = std::fs::read(tmp.path().join("nginx/conf/mime.types")).unwrap();
    assert_eq!(data, b"mime types info");
}

#[test]
fn configure_copies_htpasswd_with_basic_auth() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Staticfile.auth"), "authentication info").unwrap();
    let config = SiteConfig {
        basic_auth: true,
        ..Default::default()
    };
    let mut report = Report::new();

    configure_nginx(tmp.path(), &config, &mut report).unwrap();

    let data = std::fs::read_to_string(tmp.path().join("nginx/conf/.htpasswd")).unwrap();
    assert_eq!(data, "authentication info");
    let conf = std::fs::read_to_string(tmp.path().join("nginx/conf/nginx.conf")).unwrap();
    assert!(conf.contains(BASIC_AUTH_CONF));
    assert!(!report.to_string().contains("authentication info"));
}

#[test]
fn configure_fails_when_auth_file_missing() {
    let tmp = TempDir::new().unwrap();
    let config = SiteConfig {
        basic_auth: true,
        ..Default::default()
    };

    let err = configure_nginx(tmp.path(), &config, &mut Report::new()).unwrap_err();
    assert!(err.to_string().contains("Staticfile.auth"));
}

#[cfg(unix)]
#[test]
fn configure_creates_non_world_writable_dirs() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    configure_nginx(tmp.path(), &SiteConfig::default(), &mut Report::new()).unwrap();

    let mode = std::fs::metadata(tmp.path().join("nginx/conf"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o002, 0);
}

#[test]
fn rendered_config_prefers_override() {
    let tmp = TempDir::new().unwrap();
    let generated = nginx_conf(tmp.path(), &SiteConfig::default());
    assert!(matches!(generated, RenderedConfig::Generated(_)));

    std::fs::create_dir_all(tmp.path().join("public")).unwrap();
    std::fs::write(tmp.path().join("public/nginx.conf"), "custom").unwrap();
    let rendered = nginx_conf(tmp.path(), &SiteConfig::default());
    assert!(rendered.is_override());
    assert_eq!(rendered.contents().unwrap(), b"custom");
}
