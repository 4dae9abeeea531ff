//! The navigation bar shown at the top of each page, and at the bottom on small screens.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }

    fn into_bottom_html(self) -> Markup {
        let style = if self.is_current {
            "flex w-full min-w-0 items-center justify-center rounded-lg \
            bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
            text-blue-700 shadow-sm sm:px-4 sm:text-sm \
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "flex w-full min-w-0 items-center justify-center rounded-lg \
            px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
            sm:px-4 sm:text-sm \
            hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
            dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                span class="truncate" { (self.title) }
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    /// The create pages count as part of the list they add to.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Home",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::EXPENSES_VIEW,
                title: "Expenses",
                is_current: active_endpoint == endpoints::EXPENSES_VIEW
                    || active_endpoint == endpoints::NEW_EXPENSE_VIEW,
            },
            Link {
                url: endpoints::INCOMES_VIEW,
                title: "Incomes",
                is_current: active_endpoint == endpoints::INCOMES_VIEW
                    || active_endpoint == endpoints::NEW_INCOME_VIEW,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Wallet"
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.clone().into_iter() {
                                li { (link.into_desktop_html()) }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid grid-cols-3 gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            aria-label="Primary"
                        {
                            @for link in links.into_iter() {
                                li class="min-w-0" { (link.into_bottom_html()) }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use std::collections::HashMap;

    use scraper::{Html, Selector};

    use crate::{endpoints, navigation::NavBar};

    #[test]
    fn set_active_endpoint() {
        let mut cases = HashMap::new();
        cases.insert(endpoints::DASHBOARD_VIEW, true);
        cases.insert(endpoints::EXPENSES_VIEW, true);
        cases.insert(endpoints::INCOMES_VIEW, true);

        cases.insert(endpoints::ROOT, false);
        cases.insert(endpoints::INTERNAL_ERROR_VIEW, false);
        cases.insert(endpoints::TRANSACTIONS_API, false);
        cases.insert(endpoints::EDIT_TRANSACTION_VIEW, false);

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint);

            assert_link_active(nav_bar, endpoint, should_be_active);
        }
    }

    #[test]
    fn create_page_highlights_its_list() {
        let nav_bar = NavBar::new(endpoints::NEW_INCOME_VIEW);

        let current: Vec<_> = nav_bar
            .links
            .iter()
            .filter(|link| link.is_current)
            .map(|link| link.url)
            .collect();

        assert_eq!(current, vec![endpoints::INCOMES_VIEW]);
    }

    #[test]
    fn renders_links_for_both_layouts() {
        let html = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
        let fragment = Html::parse_fragment(&html.into_string());

        let selector = Selector::parse("a[href='/expenses']").unwrap();
        assert_eq!(fragment.select(&selector).count(), 2);

        let current = Selector::parse("a[aria-current=page]").unwrap();
        let current_links: Vec<_> = fragment
            .select(&current)
            .map(|link| link.value().attr("href"))
            .collect();
        assert_eq!(current_links, vec![Some(endpoints::EXPENSES_VIEW)]);
    }

    #[track_caller]
    fn assert_link_active(nav_bar: NavBar<'_>, endpoint: &str, should_be_active: bool) {
        let get_active_string = |is_active: bool| -> &str {
            if is_active {
                "active (true)"
            } else {
                "inactive (false)"
            }
        };

        for link in nav_bar.links {
            if link.url == endpoint {
                assert_eq!(
                    link.is_current,
                    should_be_active,
                    "Link for current page should be {} but got {}",
                    get_active_string(should_be_active),
                    get_active_string(link.is_current),
                )
            } else {
                assert!(
                    !link.is_current,
                    "Link for inactive page should {} but got {}",
                    get_active_string(false),
                    get_active_string(link.is_current)
                )
            }
        }
    }
}
