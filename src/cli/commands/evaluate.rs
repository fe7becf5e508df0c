//! One-shot evaluation command.

use anyhow::{Context, Result};
use chrono::Utc;
use signal_config::AppConfig;
use signal_core::types::BarSeries;
use signal_engine::{CompositeSignal, Evaluation};
use signal_indicators::IndicatorId;
use signal_monitor::{ReportFormat, SignalReport};

use super::build_source;
use crate::cli::EvaluateArgs;

pub async fn run(args: EvaluateArgs, mut config: AppConfig) -> Result<()> {
    args.market.apply(&mut config);
    config.validate().context("invalid settings")?;

    let source = build_source(args.market.data.as_deref(), &config)?;
    let market = &config.market;

    let bars = source
        .fetch_bars(&market.symbol, market.timeframe, market.limit)
        .await
        .with_context(|| format!("failed to fetch {} {} bars", market.symbol, market.timeframe))?;
    let series = BarSeries::new(market.symbol.clone(), market.timeframe, bars)
        .context("bar source returned a malformed series")?;

    let engine = CompositeSignal::new();
    let outcome = engine.try_evaluate(&series);
    let signal = CompositeSignal::settle(series.symbol(), &outcome);
    let report = SignalReport::new(Utc::now(), series.symbol(), series.timeframe(), signal, &outcome);

    let format = ReportFormat::from(args.output);
    match (format, &outcome) {
        (ReportFormat::Json, Ok(evaluation)) if args.details => {
            println!("{}", serde_json::to_string_pretty(evaluation)?);
        }
        _ => println!("{}", report.render(format)),
    }

    if args.details && format == ReportFormat::Text {
        match &outcome {
            Ok(evaluation) => print_details(evaluation, series.len()),
            Err(e) => println!("  degraded: {}", e),
        }
    }

    Ok(())
}

fn print_details(evaluation: &Evaluation, bars: usize) {
    println!("  bars:  {}", bars);
    println!("  trend: {}", evaluation.trend);
    println!("  score: {:+}", evaluation.score.total());
    for vote in evaluation.score.votes() {
        println!("    {:<12} {:+}", vote.rule.name(), vote.vote);
    }

    let snapshot = &evaluation.snapshot;
    println!("  close: {:.4}", snapshot.close);
    let values = [
        (IndicatorId::Rsi, snapshot.rsi),
        (IndicatorId::Macd, snapshot.macd),
        (IndicatorId::MacdSignal, snapshot.macd_signal),
        (IndicatorId::MacdHistogram, snapshot.macd_hist),
        (IndicatorId::BbUpper, snapshot.bb_upper),
        (IndicatorId::BbMiddle, snapshot.bb_middle),
        (IndicatorId::BbLower, snapshot.bb_lower),
        (IndicatorId::Atr, snapshot.atr),
        (IndicatorId::Adx, snapshot.adx),
        (IndicatorId::DiPlus, snapshot.di_plus),
        (IndicatorId::DiMinus, snapshot.di_minus),
        (IndicatorId::StochK, snapshot.stoch_k),
        (IndicatorId::StochD, snapshot.stoch_d),
        (IndicatorId::Vwap, snapshot.vwap),
        (IndicatorId::Cci, snapshot.cci),
        (IndicatorId::Roc, snapshot.roc),
        (IndicatorId::Mfi, snapshot.mfi),
        (IndicatorId::Ema50, snapshot.ema_50),
        (IndicatorId::Ema200, snapshot.ema_200),
        (IndicatorId::WilliamsR, snapshot.williams_r),
    ];
    for (id, value) in values {
        match value {
            Some(v) => println!("    {:<12} {:.4}", id.name(), v),
            None => println!("    {:<12} n/a", id.name()),
        }
    }
}
