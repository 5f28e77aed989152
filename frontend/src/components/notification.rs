use leptos::prelude::*;
use std::time::Duration;

/// 短暂显示的通知
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// 创建通知信号，3 秒后自动清除
pub fn notice_signal() -> (ReadSignal<Option<Notice>>, WriteSignal<Option<Notice>>) {
    let (notice, set_notice) = signal(Option::<Notice>::None);
    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            set_timeout(move || set_notice.set(None), Duration::from_secs(3));
        }
    });
    (notice, set_notice)
}

/// 通知提示框
#[component]
pub fn Toast(notice: ReadSignal<Option<Notice>>) -> impl IntoView {
    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(|n| n.is_error)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.message.clone()))}</span>
                </div>
            </div>
        </Show>
    }
}
