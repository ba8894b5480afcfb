#![no_std]
#![no_main]

mod fmt;

mod config;
mod edge_counter;
mod hardware;
mod motor_driver;
mod state;
mod tasks;

#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use {defmt_rtt as _, panic_probe as _};

use embassy_executor::Spawner;
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Input, Level, Output, Pull, Speed},
};

use motor_driver::GpioPhaseDriver;
use tasks::{control_task, hall_task, led_task, speed_sampler_task};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // ハードウェア初期化
    let config = hardware::create_clock_config();
    let p = embassy_stm32::init(config);

    info!("═══════════════════════════════════════════════════════════════════");
    info!("    Hall-sensored six-step BLDC controller • STM32G431VB @ 170MHz");
    info!("═══════════════════════════════════════════════════════════════════");

    // LED初期化＆タスク起動
    let led1 = Output::new(p.PC13, Level::High, Speed::Low);
    let led2 = Output::new(p.PC14, Level::High, Speed::Low);
    let led3 = Output::new(p.PC15, Level::High, Speed::Low);
    spawner.spawn(led_task(led1, led2, led3)).unwrap();

    // 巻線出力（PE8-PE13、全出力Lowでフローティング）
    let driver = GpioPhaseDriver::new([
        Output::new(p.PE9, Level::Low, Speed::VeryHigh),
        Output::new(p.PE8, Level::Low, Speed::VeryHigh),
        Output::new(p.PE11, Level::Low, Speed::VeryHigh),
        Output::new(p.PE10, Level::Low, Speed::VeryHigh),
        Output::new(p.PE13, Level::Low, Speed::VeryHigh),
        Output::new(p.PE12, Level::Low, Speed::VeryHigh),
    ]);

    // Hallセンサー入力（PB6=H1、PB7=H2、PB8=H3、外部プルアップ前提）
    let h1 = ExtiInput::new(p.PB6, p.EXTI6, Pull::None);
    let h2 = ExtiInput::new(p.PB7, p.EXTI7, Pull::None);
    let h3 = ExtiInput::new(p.PB8, p.EXTI8, Pull::None);

    // TIM2 周波数入力（PA0）
    unsafe {
        hardware::init_frequency_input();
    }

    let initial = hardware::read_hall_lines();
    info!("Initial hall code: {}", initial.code());

    spawner.spawn(control_task(driver, initial)).unwrap();
    spawner.spawn(hall_task(h1, h2, h3, initial)).unwrap();
    spawner.spawn(speed_sampler_task()).unwrap();

    // 遅延調整ボタン（PC10=増加、PC11=減少、アクティブLow）
    let increase = Input::new(p.PC10, Pull::Up);
    let decrease = Input::new(p.PC11, Pull::Up);

    info!("Starting six-step commutation...");

    // メインループ
    tasks::panel::run(increase, decrease).await
}
