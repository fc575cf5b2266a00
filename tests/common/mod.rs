#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

pub const GEMFILE: &str = "source \"https://rubygems.org\"\n\ngem \"rails\", \"~> 7.1\"\n";

pub const PRODUCTION: &str = "require \"active_support/core_ext/integer/time\"\n\nRails.application.configure do\n  config.eager_load = true\nend\n";

pub const CONTROLLER: &str = "class ApplicationController < ActionController::Base\nend\n";

pub const DATABASE: &str = "default: &default\n  adapter: postgresql\n\nproduction:\n  <<: *default\n  database: app_production\n";

/// A project holding only a Gemfile and a production environment file.
pub fn minimal_project() -> TempDir {
    let dir = tempfile::Builder::new().prefix("shop_front-").tempdir().unwrap();
    write(dir.path(), "Gemfile", GEMFILE);
    write(dir.path(), "config/environments/production.rb", PRODUCTION);
    dir
}

/// A project with every file the anchored edits look for.
pub fn full_project() -> TempDir {
    let dir = minimal_project();
    write(dir.path(), "app/controllers/application_controller.rb", CONTROLLER);
    write(dir.path(), "config/database.yml", DATABASE);
    write(dir.path(), "README.md", "# Shop Front\n");
    write(dir.path(), ".ruby-version", "ruby-3.3.0\n");
    dir
}

pub fn write(root: &Path, path: &str, content: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;
    fs::metadata(path).unwrap().permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}
