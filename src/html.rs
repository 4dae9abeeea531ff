use maud::{DOCTYPE, Markup, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "block text-center w-full py-2.5 px-5 mb-2 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The currency amounts are shown in.
pub const CURRENCY_SYMBOL: &str = "AOA";

// Pinned script versions, checked with subresource integrity.
pub const HTMX_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js";
pub const HTMX_SCRIPT_INTEGRITY: &str =
    "sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz";
pub const RESPONSE_TARGETS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4";
pub const RESPONSE_TARGETS_SCRIPT_INTEGRITY: &str =
    "sha384-T41oglUPvXLGBVyRdZsVRxNWnOOqCynaPubjUVjxhsjFTKrFJGEMm3/0KGmNQ+Pg";
// Compiles the Tailwind classes used in the markup in the browser.
pub const TAILWIND_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4.1.17";

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Wallet" }

                script
                    src=(HTMX_SCRIPT_URL)
                    integrity=(HTMX_SCRIPT_INTEGRITY)
                    crossorigin="anonymous"
                {}
                script
                    src=(RESPONSE_TARGETS_SCRIPT_URL)
                    integrity=(RESPONSE_TARGETS_SCRIPT_INTEGRITY)
                    crossorigin="anonymous"
                {}
                script src=(TAILWIND_SCRIPT_URL) {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }

                    .input-wrapper {
                        position: relative;
                        display: inline-block;
                    }

                    .input-wrapper input[type="number"] {
                        padding-left: 3rem;
                    }

                    .input-wrapper::before {
                        content: 'AOA';
                        position: absolute;
                        left: 0.6rem;
                        top: 50%;
                        transform: translateY(-50%);
                        pointer-events: none;
                    }
                    "#
                }
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content)
}

/// A banner for a page section whose data could not be loaded.
pub fn error_banner(title: &str, message: &str) -> Markup {
    html! {
        div
            role="alert"
            class="w-full p-4 text-sm text-red-800 rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400"
        {
            p class="font-medium" { (title) }
            p { (message) }
        }
    }
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// Format `number` as an amount of money with two decimal places, e.g. "AOA 1,234.50".
pub fn format_currency(number: f64) -> String {
    static FORMATTER: OnceLock<Option<Formatter>> = OnceLock::new();

    let formatter = FORMATTER.get_or_init(|| {
        Formatter::currency(&format!("{CURRENCY_SYMBOL} "))
            .inspect_err(|error| tracing::error!("could not create currency formatter: {error:?}"))
            .ok()
            .map(|formatter| formatter.precision(Precision::Decimals(2)))
    });

    let amount = number.abs();
    let mut formatted_string = match formatter {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        Some(_) if amount == 0.0 => format!("{CURRENCY_SYMBOL} 0"),
        Some(formatter) => formatter.fmt_string(amount),
        None => format!("{CURRENCY_SYMBOL} {amount:.2}"),
    };

    // numfmt drops trailing zeros, e.g. "12.30" is rendered as "12.3", so pad to two decimals.
    let decimals = formatted_string
        .rfind('.')
        .map(|point| formatted_string.len() - point - 1);
    match decimals {
        None => formatted_string.push_str(".00"),
        Some(decimals) => (decimals..2).for_each(|_| formatted_string.push('0')),
    }

    if number < 0.0 {
        format!("-{formatted_string}")
    } else {
        formatted_string
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}


#[cfg(test)]
mod format_currency_tests {
    use super::format_currency;

    #[test]
    fn pads_to_two_decimals() {
        assert_eq!(format_currency(85.5), "AOA 85.50");
        assert_eq!(format_currency(40.0), "AOA 40.00");
        assert_eq!(format_currency(0.25), "AOA 0.25");
    }

    #[test]
    fn zero() {
        assert_eq!(format_currency(0.0), "AOA 0.00");
    }

    #[test]
    fn negative_amounts_get_leading_sign() {
        assert_eq!(format_currency(-40.0), "-AOA 40.00");
    }
}
