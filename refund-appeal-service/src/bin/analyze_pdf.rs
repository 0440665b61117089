use anyhow::Result;
use refund_appeal::{AnalysisClient, EvidenceDocument, render_report, verify};
use refund_appeal_service::init_tracing;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <pdf_file_path>", args[0]);
        eprintln!("Example: {} /path/to/booking-confirmation.pdf", args[0]);
        std::process::exit(1);
    }

    let client = AnalysisClient::from_env();

    let outcome = match EvidenceDocument::from_path(&args[1]).await {
        Ok(document) => client.analyze(&document).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            let audit = verify(&result);
            println!("{}", render_report(&result, &audit));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}
