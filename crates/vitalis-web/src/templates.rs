//! HTML templates, compiled into the binary and rendered with minijinja.

use minijinja::Environment;
use serde::Serialize;

const LAYOUT_HTML: &str = include_str!("../templates/layout.html");
const HOME_HTML: &str = include_str!("../templates/home.html");
const RESULT_HTML: &str = include_str!("../templates/result.html");

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT_HTML)?;
        env.add_template("home.html", HOME_HTML)?;
        env.add_template("result.html", RESULT_HTML)?;
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}
