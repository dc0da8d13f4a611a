//! CLI for content-stream: browse content, view products, submit enquiries.

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::config::StudioConfig;
use crate::contract::{ContentGateway, UpdateFeed};
use crate::enquiry::submit_enquiry;
use crate::feed::{ChannelFeed, NoopFeed};
use crate::gateway::SanityGateway;
use crate::model::{ContentItem, EnquiryRequest, Filter};
use crate::page::{product_page, HomeSession, LoadIndicator, ProductPage};

#[derive(Parser)]
#[clap(
    name = "content-stream",
    version,
    about = "Browse content and products from a headless CMS and submit product enquiries"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List content items, optionally filtered by category and search term
    Browse {
        /// Category to filter by ("all" for no category filter)
        #[clap(long, default_value = "all")]
        category: String,
        /// Case-insensitive search term matched against title and excerpt
        #[clap(long, default_value = "")]
        search: String,
    },
    /// Show the product detail page for a slug
    Product {
        /// The product slug
        slug: String,
    },
    /// Submit a product enquiry
    Enquire {
        /// Name of the product the enquiry is about
        #[clap(long)]
        product: String,
        /// Full name
        #[clap(long)]
        name: String,
        /// Email address
        #[clap(long)]
        email: String,
        /// Mobile number
        #[clap(long)]
        mobile: String,
        /// The enquiry text (10-500 characters)
        #[clap(long)]
        message: String,
    },
    /// Browse and keep the view live from a synthetic demo feed
    Watch {
        #[clap(long, default_value = "all")]
        category: String,
        #[clap(long, default_value = "")]
        search: String,
        /// How many synthetic items the demo feed publishes
        #[clap(long, default_value_t = 3)]
        count: u32,
        /// Seconds between published items
        #[clap(long, default_value_t = 15)]
        interval_secs: u64,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let config = StudioConfig::from_env();
    config.trace_loaded();
    let gateway = SanityGateway::new(config);

    match cli.command {
        Commands::Browse { category, search } => {
            let mut session = HomeSession::new(gateway, NoopFeed);
            session.initial_load().await;
            let wants_filter = Filter::new(category, search);
            if !wants_filter.is_unfiltered() {
                session.set_filter(wants_filter).await;
            }
            print_home(&session);
            if session.render().blocking_error.is_some() {
                anyhow::bail!("initial load failed");
            }
            Ok(())
        }
        Commands::Product { slug } => {
            match product_page(&gateway, &slug).await {
                Ok(ProductPage::Found(product)) => {
                    println!("{}", product.name);
                    if let Some(category) = &product.category {
                        println!("Category: {category}");
                    }
                    if let Some(description) = &product.description {
                        println!("\n{description}");
                    }
                    match &product.details {
                        Some(details) => println!("\n{details}"),
                        None => println!("\nNo additional details provided for this product."),
                    }
                    if let Some(price) = product.price {
                        println!("\nPrice: ${price:.2}");
                    }
                    if let Some(url) = &product.buy_now_url {
                        println!("Buy: {url}");
                    }
                }
                Ok(ProductPage::NotFound { slug }) => {
                    println!("Product not found: {slug}");
                }
                Err(e) => anyhow::bail!("failed to fetch product: {e}"),
            }
            Ok(())
        }
        Commands::Enquire {
            product,
            name,
            email,
            mobile,
            message,
        } => {
            let request = EnquiryRequest {
                product_name: product,
                name,
                email,
                mobile,
                enquiry: message,
            };
            match submit_enquiry(&gateway, &request).await {
                Ok(result) if result.success => {
                    println!("Enquiry sent! {}", result.message);
                    Ok(())
                }
                Ok(result) => {
                    eprintln!("Submission failed: {}", result.message);
                    Err(anyhow::Error::msg(result.message))
                }
                Err(field_errors) => {
                    for error in &field_errors {
                        eprintln!("{error}");
                    }
                    anyhow::bail!("enquiry validation failed")
                }
            }
        }
        Commands::Watch {
            category,
            search,
            count,
            interval_secs,
        } => {
            let feed = ChannelFeed::new();
            let mut session = HomeSession::new(gateway, feed.clone());
            session.initial_load().await;
            session.set_filter(Filter::new(category, search)).await;
            print_home(&session);
            if session.render().blocking_error.is_some() {
                anyhow::bail!("initial load failed");
            }

            // Demo fixture: a fixed-interval synthetic publisher standing in
            // for a real push collaborator.
            let publisher = tokio::spawn(async move {
                for n in 1..=count {
                    tokio::time::sleep(Duration::from_secs(interval_secs)).await;
                    feed.publish(demo_item(n));
                }
            });

            while !publisher.is_finished() {
                tokio::time::sleep(Duration::from_millis(250)).await;
                for notice in session.pump_feed() {
                    println!("New content added: \"{}\"", notice.title);
                }
            }
            // Drain whatever is left, then stop.
            tokio::time::sleep(Duration::from_millis(250)).await;
            for notice in session.pump_feed() {
                println!("New content added: \"{}\"", notice.title);
            }
            session.close();
            print_home(&session);
            Ok(())
        }
    }
}

fn print_home<G, F>(session: &HomeSession<G, F>)
where
    G: ContentGateway,
    F: UpdateFeed,
{
    let render = session.render();
    if let Some(error) = render.blocking_error {
        eprintln!("Error: {error}");
        eprintln!("Filtering and real-time updates are currently disabled.");
        return;
    }
    println!("Categories: {}", render.categories.join(", "));
    match render.indicator {
        LoadIndicator::FirstLoad => println!("Loading content..."),
        LoadIndicator::Refresh => println!("Updating content..."),
        LoadIndicator::None => {}
    }
    if let Some(error) = render.inline_error {
        println!("Update error: {error}");
    }
    if render.no_content {
        println!("No content found. There are no items matching your current filters.");
        return;
    }
    for item in render.items {
        let category = item.category.as_deref().unwrap_or("uncategorised");
        println!(
            "- [{}] {} ({})",
            item.created_at.format("%Y-%m-%d %H:%M"),
            item.title,
            category
        );
        if let Some(excerpt) = &item.excerpt {
            println!("    {excerpt}");
        }
    }
}

fn demo_item(n: u32) -> ContentItem {
    ContentItem {
        id: format!("demo-{n}"),
        created_at: Utc::now(),
        title: format!("Demo update #{n}"),
        slug: None,
        excerpt: Some("Synthetic item published by the demo feed.".to_string()),
        category: None,
    }
}
