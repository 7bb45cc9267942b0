use anyhow::bail;
use bind_positionals::{
    bare_double_dash_args, name_arg, names_arg, Args, Command, Flag, Parsed, Prop,
};
use std::env::args;
use std::io::stdout;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CreateOptions {
    name: String,
}

#[derive(Debug, Default)]
struct DeleteOptions {
    names: Vec<String>,
}

#[derive(Debug, Default)]
struct InvokeOptions {
    name: String,
    curl_args: Option<Vec<String>>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut create = CreateOptions::default();
    let mut delete = DeleteOptions::default();
    let mut invoke = InvokeOptions::default();

    let parsed = {
        let mut app = Command::new("handler", "handlers map HTTP requests to applications")
            .add_alias("handlers")
            .add_command(
                Command::new("create", "create a handler")
                    .add_prop(Prop::new("image", "container image to run").make_required())
                    .args(Args::build([name_arg(&mut create.name)])?),
            )
            .add_command(
                Command::new("delete", "delete handlers")
                    .add_flag(Flag::new("all", "delete every handler"))
                    .args(Args::build([names_arg(&mut delete.names)])?),
            )
            .add_command(
                Command::new("invoke", "invoke a handler").args(Args::build([
                    name_arg(&mut invoke.name),
                    bare_double_dash_args(&mut invoke.curl_args),
                ])?),
            );

        match app.parse_from(args())? {
            Parsed::Help(request) => {
                app.write_help_for(&request, stdout())?;
                return Ok(());
            }
            Parsed::Run(matches) => matches,
        }
    };

    match parsed.path().get(1).copied() {
        Some("create") => {
            let image = &parsed.leaf().props["image"];
            println!("creating handler {} from {image}", create.name);
        }
        Some("delete") if parsed.leaf().flags.contains("all") => {
            if !delete.names.is_empty() {
                bail!("names may not be given together with +all");
            }
            println!("deleting all handlers");
        }
        Some("delete") => println!("deleting handlers {:?}", delete.names),
        Some("invoke") => println!(
            "invoking {} with curl arguments {:?}",
            invoke.name,
            invoke.curl_args.unwrap_or_default()
        ),
        _ => bail!("a command is required"),
    }

    Ok(())
}
