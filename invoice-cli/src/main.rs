use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use diy_invoice::{
  InvoiceForm, InvoiceRecord, InvoiceService, InvoiceStore, RenderFormat, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "invoice-cli", about = "Create invoices and export them as PDF or HTML")]
struct Cli {
  /// JSON settings file (defaultCurrency, minQuantity, footerNote, printFrameHeight)
  #[arg(long, global = true)]
  settings: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a single invoice and export it.
  Create {
    #[arg(long)]
    client: String,

    #[arg(long)]
    description: String,

    /// e.g. hours, words, articles, items
    #[arg(long, default_value = "")]
    unit: String,

    #[arg(long, default_value_t = 1.0)]
    quantity: f64,

    #[arg(long, default_value_t = 0.0)]
    rate: f64,

    /// Defaults to the configured currency (PKR)
    #[arg(long)]
    currency: Option<String>,

    #[command(flatten)]
    output: OutputArgs,
  },

  /// Create every invoice in a JSON array of forms as one session.
  Batch {
    #[arg(long)]
    input: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
  },
}

#[derive(Args, Debug)]
struct OutputArgs {
  #[arg(long, value_enum, default_value_t = OutputKind::Pdf)]
  format: OutputKind,

  #[arg(long, default_value = ".")]
  out_dir: PathBuf,

  /// Write the HTML view wrapped in a sandboxed iframe
  #[arg(long)]
  print_frame: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputKind {
  Pdf,
  Html,
  Both,
}

impl OutputKind {
  fn formats(self) -> &'static [RenderFormat] {
    match self {
      OutputKind::Pdf => &[RenderFormat::Pdf],
      OutputKind::Html => &[RenderFormat::Html],
      OutputKind::Both => &[RenderFormat::Pdf, RenderFormat::Html],
    }
  }
}

fn main() -> anyhow::Result<()> {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let cli = Cli::parse();
  let settings = load_settings(cli.settings.as_deref())?;
  let mut service = InvoiceService::new(InvoiceStore::new(), settings);

  match cli.command {
    Command::Create {
      client,
      description,
      unit,
      quantity,
      rate,
      currency,
      output,
    } => {
      let form = InvoiceForm {
        client,
        description,
        unit,
        quantity,
        rate,
        currency,
      };
      let record = service.create(form).context("could not create invoice")?;
      println!("Invoice #{} created!", record.id());
      export(&service, &record, &output)?;
    }

    Command::Batch { input, output } => {
      let json = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
      let forms: Vec<InvoiceForm> = serde_json::from_str(&json)
        .with_context(|| format!("invalid invoice forms in {}", input.display()))?;

      for (idx, form) in forms.into_iter().enumerate() {
        match service.create(form) {
          Ok(record) => println!("Invoice #{} created!", record.id()),
          Err(e) if e.is_validation() => eprintln!("entry {}: {e}", idx + 1),
          Err(e) => return Err(e).context("could not create invoice"),
        }
      }

      print_listing(&service)?;
      for record in service.invoices()? {
        export(&service, &record, &output)?;
      }
    }
  }

  Ok(())
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
  match path {
    Some(p) => Settings::load(p).with_context(|| format!("failed to load settings from {}", p.display())),
    None => Ok(Settings::default()),
  }
}

fn print_listing(service: &InvoiceService) -> anyhow::Result<()> {
  let invoices = service.invoices()?;
  if invoices.is_empty() {
    println!("No invoices yet. Fill the form to create one.");
    return Ok(());
  }

  println!("Generated Invoices");
  for record in &invoices {
    println!("{}", record.summary_line());
    for line in record.detail_lines() {
      println!("    {line}");
    }
  }
  Ok(())
}

fn export(service: &InvoiceService, record: &InvoiceRecord, output: &OutputArgs) -> anyhow::Result<()> {
  fs::create_dir_all(&output.out_dir)
    .with_context(|| format!("failed to create {}", output.out_dir.display()))?;

  let id = record.id().as_str();
  for &format in output.format.formats() {
    let rendered = service.render(id, format)?;
    let path = output.out_dir.join(&rendered.file_name);
    let bytes = if format == RenderFormat::Html && output.print_frame {
      service.print_view(id)?.into_bytes()
    } else {
      rendered.into_bytes()
    };

    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("[export] wrote {} ({})", path.display(), format.mime());
    println!("{}", path.display());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn create_defaults_match_the_form() {
    let cli = Cli::parse_from(["invoice-cli", "create", "--client", "Acme", "--description", "Logo"]);
    match cli.command {
      Command::Create {
        quantity,
        rate,
        currency,
        output,
        ..
      } => {
        assert_eq!(quantity, 1.0);
        assert_eq!(rate, 0.0);
        assert_eq!(currency, None);
        assert_eq!(output.format, OutputKind::Pdf);
        assert_eq!(output.out_dir, PathBuf::from("."));
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn both_exports_pdf_then_html() {
    assert_eq!(OutputKind::Both.formats(), &[RenderFormat::Pdf, RenderFormat::Html]);
  }
}
